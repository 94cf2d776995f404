//! engine::context
//!
//! Application context assembly.
//!
//! # Startup order
//!
//! 1. The working directory must be inside a git repository
//! 2. The configuration is loaded (first-run setup if there is none)
//! 3. The forge client is built and the origin identity resolved, concurrently
//! 4. The client is scoped to the identity
//!
//! Any failure here is fatal: no workflow runs without a complete context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::config::{Config, ConfigStore};
use crate::core::intent::IntentDefaults;
use crate::core::types::RemoteIdentity;
use crate::forge::github::GitHubClient;
use crate::forge::Forge;
use crate::git::Git;
use crate::ui::prompts::Prompter;

use super::report::{JsonLinesReporter, Reporter};
use super::WorkflowError;

/// Everything a workflow needs, assembled once per run.
pub struct ApplicationContext {
    pub config: Config,
    pub identity: RemoteIdentity,
    pub forge: Arc<dyn Forge>,
    pub reporter: Arc<dyn Reporter>,
    /// Directory the command was started in
    pub work_dir: PathBuf,
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("config", &self.config)
            .field("identity", &self.identity)
            .field("forge", &self.forge.name())
            .field("work_dir", &self.work_dir)
            .finish()
    }
}

impl ApplicationContext {
    pub fn new(
        config: Config,
        identity: RemoteIdentity,
        forge: Arc<dyn Forge>,
        reporter: Arc<dyn Reporter>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            identity,
            forge,
            reporter,
            work_dir: work_dir.into(),
        }
    }

    /// The branch checked out in the working directory, `None` if detached.
    pub fn current_branch(&self) -> Result<Option<String>, WorkflowError> {
        Ok(Git::open(&self.work_dir)?.current_branch()?)
    }

    /// Defaults offered to intent builders for this run.
    pub fn intent_defaults(&self, head: Option<&str>) -> IntentDefaults {
        IntentDefaults::new(&self.config, head)
    }
}

/// Fail with [`WorkflowError::NotAGitRepository`] unless `work_dir` is in a repo.
pub fn ensure_git_repository(work_dir: &Path) -> Result<(), WorkflowError> {
    if Git::is_project_using_git(work_dir) {
        Ok(())
    } else {
        Err(WorkflowError::NotAGitRepository)
    }
}

/// Assemble the context for `work_dir`.
pub async fn bootstrap(
    work_dir: &Path,
    store: &ConfigStore,
    prompter: &dyn Prompter,
) -> Result<ApplicationContext, WorkflowError> {
    ensure_git_repository(work_dir)?;

    let config = store.get_config(prompter)?;

    let (client, identity) = tokio::try_join!(
        connect(&config),
        resolve_identity(work_dir.to_path_buf())
    )?;
    log::debug!("repository {} via {}", identity, config.api_base());

    let forge = client.for_repository(&identity);
    let reporter = JsonLinesReporter::new(store.reports_path());

    Ok(ApplicationContext::new(
        config,
        identity,
        Arc::new(forge),
        Arc::new(reporter),
        work_dir,
    ))
}

async fn connect(config: &Config) -> Result<GitHubClient, WorkflowError> {
    Ok(GitHubClient::new(&config.token, config.api_base())?)
}

async fn resolve_identity(work_dir: PathBuf) -> Result<RemoteIdentity, WorkflowError> {
    let identity = tokio::task::spawn_blocking(move || Git::open(&work_dir)?.origin_remote())
        .await
        .map_err(|e| WorkflowError::Task(e.to_string()))??;
    Ok(identity)
}
