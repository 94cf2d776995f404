//! engine
//!
//! Workflow orchestrator: Resolving -> Executing -> Reporting.
//!
//! # Architecture
//!
//! The engine reconciles local repository state with forge state to drive
//! the Fetch and Pull-Request workflows, plus the Sync and Update maintenance
//! operations.
//!
//! Every workflow run moves through three states:
//!
//! ```text
//! Resolving (flags or prompts) -> Executing (git / forge calls) -> Reporting
//! ```
//!
//! Resolving is the only place Dry and Onboard modes differ. Each mode is an
//! [`IntentSource`] strategy that produces the same intent values; execution
//! and reporting are shared. A run ends at the first unrecoverable error and
//! nothing is retried.
//!
//! # Invariants
//!
//! - An intent is resolved and validated before the first forge call
//! - Workflows receive everything through an [`ApplicationContext`]; there
//!   is no ambient global state
//! - Reporting is best-effort and never fails the primary outcome
//! - A multi-step workflow that fails halfway is left as-is and reported as
//!   [`WorkflowError::Incomplete`]

pub mod context;
pub mod fetch;
pub mod intent;
pub mod maintenance;
pub mod menu;
pub mod pull_request;
pub mod report;

pub use context::{bootstrap, ensure_git_repository, ApplicationContext};
pub use fetch::fetch_workflow;
pub use intent::{FlagIntents, IntentSource, PromptedIntents, PullRequestFlags};
pub use menu::guided;
pub use pull_request::pull_request_workflow;
pub use report::{JsonLinesReporter, ReportError, ReportOutcome, ReportRecord, Reporter};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::intent::IntentError;
use crate::forge::ForgeError;
use crate::git::{GitError, UPSTREAM};
use crate::ui::prompts::PromptError;

/// How a workflow gathers its intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Flags given on the command line.
    Dry,
    /// Interactive prompts.
    Onboard,
}

/// Errors that end a workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Not a git repository (or any of the parent directories): .git not found")]
    NotAGitRepository,

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Intent(#[from] IntentError),

    /// A later step failed after the pull request was already changed.
    #[error("pull request #{number} ({url}) was {done}, but {step} failed: {source}")]
    Incomplete {
        number: u64,
        url: String,
        done: &'static str,
        step: String,
        #[source]
        source: ForgeError,
    },

    #[error("'{path}' is not inside a git checkout of gitray; set GITRAY_HOME to the checkout to update")]
    InstallNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

impl WorkflowError {
    /// A follow-up suggestion for the user, if there is an obvious one.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            WorkflowError::Forge(e) | WorkflowError::Incomplete { source: e, .. }
                if e.is_auth_error() =>
            {
                Some("run `gitray config` to update your access token")
            }
            WorkflowError::Forge(ForgeError::RateLimited) => {
                Some("the API rate limit is exhausted; wait for it to reset and try again")
            }
            WorkflowError::Git(GitError::RemoteMissing { name }) if name == UPSTREAM => {
                Some("add the original repository with `git remote add upstream <url>`")
            }
            WorkflowError::Prompt(PromptError::NotInteractive)
            | WorkflowError::Config(ConfigError::Prompt(PromptError::NotInteractive)) => {
                Some("run this command in a terminal, or use the flag-driven commands instead")
            }
            _ => None,
        }
    }
}
