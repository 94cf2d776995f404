//! core::intent
//!
//! Intents: the resolved parameters of one workflow run.
//!
//! An intent says *what* the user asked for and nothing about *how* it was
//! gathered. Flags and prompts both produce the same values, and everything
//! past this point is shared between the two interaction modes.
//!
//! # Resolution
//!
//! [`PullRequestIntent::resolve`] turns an intent into a [`Resolution`]. It is
//! pure and runs before any forge call, so conflicting targets are rejected
//! without touching the network.

use thiserror::Error;

use crate::core::config::Config;

/// Errors from resolving an intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    /// Two options that select different actions were combined.
    #[error("--{first} and --{second} cannot be used together")]
    Conflicting {
        first: &'static str,
        second: &'static str,
    },

    /// HEAD does not point at a branch, so there is nothing to open a PR from.
    #[error("HEAD is detached; check out a branch before opening a pull request")]
    DetachedHead,

    /// The current branch is the base branch.
    #[error("cannot open a pull request from '{0}' into itself; pass a different --base")]
    HeadIsBase(String),
}

/// What to do about a review comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommentChoice {
    /// Use the configured default comment, if any.
    #[default]
    Inherit,
    /// Use this text.
    Text(String),
    /// Attach no comment, whatever the defaults say.
    Disabled,
}

/// Parameters for listing open pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchIntent {
    /// Only list pull requests opened by this user
    pub user: Option<String>,
}

/// Parameters for one run of the pull-request workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestIntent {
    /// Base branch; falls back to the configured default
    pub base: Option<String>,
    /// Title; falls back to one derived from the branch name
    pub title: Option<String>,
    /// Review comment choice
    pub comment: CommentChoice,
    /// Emit a report record after the pull request is created or forwarded
    pub report: bool,
    /// Forward the current user's open pull request to this user
    pub forward: Option<String>,
    /// Open a pull request and send it to this user
    pub send: Option<String>,
    /// `--send` was given, with or without a user
    pub send_requested: bool,
    /// List pull requests instead of changing anything
    pub list: Option<FetchIntent>,
}

impl Default for PullRequestIntent {
    fn default() -> Self {
        Self {
            base: None,
            title: None,
            comment: CommentChoice::Inherit,
            report: true,
            forward: None,
            send: None,
            send_requested: false,
            list: None,
        }
    }
}

/// Defaults offered to intent builders.
///
/// Flag builders use these to fill gaps; prompt builders pre-fill answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentDefaults {
    pub base: String,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub report: bool,
}

impl IntentDefaults {
    /// Build defaults from the configuration and the current branch.
    pub fn new(config: &Config, head: Option<&str>) -> Self {
        Self {
            base: config.default_base().to_string(),
            title: head.map(title_from_branch),
            comment: config.default_comment.clone(),
            report: config.create_report,
        }
    }
}

/// The outcome of resolving a pull-request intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// List pull requests; nothing is mutated.
    List(FetchIntent),
    /// Create or forward a pull request.
    Change(PullRequestPlan),
}

/// A fully resolved pull-request mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestPlan {
    pub action: PlannedAction,
    pub base: String,
    /// Comment to attach; `None` when disabled or blank
    pub comment: Option<String>,
    pub report: bool,
}

/// The mutation a plan performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Open a pull request from `head`, optionally sending it to `recipient`.
    Create {
        head: String,
        title: String,
        recipient: Option<String>,
    },
    /// Forward the current user's open pull request against the base.
    ///
    /// `head` is used to prefer the pull request of the current branch.
    Forward { to: String, head: Option<String> },
}

impl PullRequestIntent {
    /// Check the intent's invariants and resolve it against the configuration.
    ///
    /// `head` is the current branch, or `None` on a detached HEAD.
    ///
    /// # Errors
    ///
    /// - [`IntentError::Conflicting`] if `forward` is combined with `--send`
    ///   (even without a recipient), or if listing is combined with either
    /// - [`IntentError::DetachedHead`] if a pull request must be created and
    ///   there is no current branch
    /// - [`IntentError::HeadIsBase`] if the current branch is the base
    pub fn resolve(self, config: &Config, head: Option<&str>) -> Result<Resolution, IntentError> {
        let sending = self.send_requested || self.send.is_some();
        if self.forward.is_some() && sending {
            return Err(IntentError::Conflicting {
                first: "forward",
                second: "send",
            });
        }

        if let Some(list) = self.list {
            if self.forward.is_some() {
                return Err(IntentError::Conflicting {
                    first: "user",
                    second: "forward",
                });
            }
            if sending {
                return Err(IntentError::Conflicting {
                    first: "user",
                    second: "send",
                });
            }
            return Ok(Resolution::List(list));
        }

        let base = self
            .base
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| config.default_base().to_string());

        let comment = match self.comment {
            CommentChoice::Disabled => None,
            CommentChoice::Text(text) => Some(text),
            CommentChoice::Inherit => config.default_comment.clone(),
        }
        .filter(|text| !text.trim().is_empty());

        let action = match self.forward {
            Some(to) => PlannedAction::Forward {
                to,
                head: head.map(String::from),
            },
            None => {
                let head = head.ok_or(IntentError::DetachedHead)?;
                if head == base {
                    return Err(IntentError::HeadIsBase(head.to_string()));
                }
                let title = self
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| title_from_branch(head));
                PlannedAction::Create {
                    head: head.to_string(),
                    title,
                    recipient: self.send,
                }
            }
        };

        Ok(Resolution::Change(PullRequestPlan {
            action,
            base,
            comment,
            report: self.report,
        }))
    }
}

/// Derive a pull-request title from a branch name.
///
/// Uses the last path segment, turns `-` and `_` into spaces, and capitalises
/// the first letter: `feature/add-log_rotation` becomes `Add log rotation`.
pub fn title_from_branch(branch: &str) -> String {
    let segment = branch
        .rsplit('/')
        .find(|s| !s.trim().is_empty())
        .unwrap_or(branch);

    let words: Vec<&str> = segment
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return branch.to_string();
    }

    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}
