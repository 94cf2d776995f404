//! engine::intent
//!
//! Intent strategies: the Resolving state of every workflow.
//!
//! [`FlagIntents`] (Dry mode) trusts parsed flags; [`PromptedIntents`]
//! (Onboard mode) asks for each value in turn. Both hand back plain
//! [`FetchIntent`]/[`PullRequestIntent`] values, so execution never knows
//! which mode it is serving.

use crate::core::intent::{CommentChoice, FetchIntent, IntentDefaults, PullRequestIntent};
use crate::ui::prompts::Prompter;

use super::{Mode, WorkflowError};

/// Source of workflow intents.
pub trait IntentSource {
    fn mode(&self) -> Mode;

    /// Intent for the Fetch workflow.
    fn fetch_intent(&self) -> Result<FetchIntent, WorkflowError>;

    /// Intent for the Pull-Request workflow.
    fn pull_request_intent(
        &self,
        defaults: &IntentDefaults,
    ) -> Result<PullRequestIntent, WorkflowError>;
}

/// Raw pull-request flags, independent of the argument parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFlags {
    pub base: Option<String>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub no_comment: bool,
    pub no_report: bool,
    pub forward: Option<String>,
    /// `Some(None)` when `--send` was given without a user
    pub send: Option<Option<String>>,
    /// `Some(None)` when `--user` was given without a user
    pub user: Option<Option<String>>,
}

/// Dry mode: intents straight from the command line.
#[derive(Debug, Clone, Default)]
pub struct FlagIntents {
    fetch: FetchIntent,
    pull_request: PullRequestFlags,
}

impl FlagIntents {
    pub fn for_fetch(fetch: FetchIntent) -> Self {
        Self {
            fetch,
            ..Self::default()
        }
    }

    pub fn for_pull_request(flags: PullRequestFlags) -> Self {
        Self {
            pull_request: flags,
            ..Self::default()
        }
    }
}

impl IntentSource for FlagIntents {
    fn mode(&self) -> Mode {
        Mode::Dry
    }

    fn fetch_intent(&self) -> Result<FetchIntent, WorkflowError> {
        Ok(FetchIntent {
            user: non_blank(self.fetch.user.as_deref()),
        })
    }

    fn pull_request_intent(
        &self,
        defaults: &IntentDefaults,
    ) -> Result<PullRequestIntent, WorkflowError> {
        let flags = &self.pull_request;

        let comment = if flags.no_comment {
            CommentChoice::Disabled
        } else if let Some(text) = &flags.comment {
            CommentChoice::Text(text.clone())
        } else {
            CommentChoice::Inherit
        };

        let send = match &flags.send {
            Some(user) => {
                let user = non_blank(user.as_deref());
                if user.is_none() {
                    log::info!("--send given without a user; opening the pull request without a recipient");
                }
                user
            }
            None => None,
        };

        let list = flags.user.as_ref().map(|user| FetchIntent {
            user: non_blank(user.as_deref()),
        });

        Ok(PullRequestIntent {
            base: non_blank(flags.base.as_deref()),
            title: non_blank(flags.title.as_deref()),
            comment,
            report: !flags.no_report && defaults.report,
            forward: non_blank(flags.forward.as_deref()),
            send,
            send_requested: flags.send.is_some(),
            list,
        })
    }
}

/// Onboard mode: intents gathered interactively.
pub struct PromptedIntents<'a> {
    prompter: &'a dyn Prompter,
}

/// Choices offered by the Onboard pull-request flow.
const PR_ACTIONS: [&str; 4] = [
    "Create a pull request",
    "Create a pull request and send it to a reviewer",
    "Forward my open pull request to someone",
    "List open pull requests",
];

const CREATE: usize = 0;
const SEND: usize = 1;
const FORWARD: usize = 2;
const LIST: usize = 3;

const FETCH_ACTIONS: [&str; 2] = ["pr: all open pull requests", "fetch: pull requests by one user"];

impl<'a> PromptedIntents<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Ask until a non-empty answer is given.
    fn required(&self, message: &str) -> Result<String, WorkflowError> {
        loop {
            let answer = self.prompter.input(message, None)?;
            if let Some(answer) = non_blank(Some(answer.as_str())) {
                return Ok(answer);
            }
        }
    }

    fn optional(&self, message: &str) -> Result<Option<String>, WorkflowError> {
        let answer = self.prompter.input(message, None)?;
        Ok(non_blank(Some(answer.as_str())))
    }
}

impl IntentSource for PromptedIntents<'_> {
    fn mode(&self) -> Mode {
        Mode::Onboard
    }

    fn fetch_intent(&self) -> Result<FetchIntent, WorkflowError> {
        let choice = self
            .prompter
            .select("What do you want to fetch?", &FETCH_ACTIONS, 0)?;

        let user = if choice == 1 {
            Some(self.required("GitHub username")?)
        } else {
            None
        };

        Ok(FetchIntent { user })
    }

    fn pull_request_intent(
        &self,
        defaults: &IntentDefaults,
    ) -> Result<PullRequestIntent, WorkflowError> {
        let action = self
            .prompter
            .select("What do you want to do?", &PR_ACTIONS, CREATE)?;

        if action == LIST {
            let user = self.optional("Filter by GitHub username (leave empty for all)")?;
            return Ok(PullRequestIntent {
                list: Some(FetchIntent { user }),
                ..PullRequestIntent::default()
            });
        }

        let base = self.prompter.input("Base branch", Some(defaults.base.as_str()))?;

        let title = if action == FORWARD {
            None
        } else {
            Some(self.prompter.input("Title", defaults.title.as_deref())?)
        };

        let comment = if self
            .prompter
            .confirm("Add a review comment?", defaults.comment.is_some())?
        {
            CommentChoice::Text(self.prompter.input("Comment", defaults.comment.as_deref())?)
        } else {
            CommentChoice::Disabled
        };

        let (send, forward) = match action {
            SEND => (Some(self.required("Send to (GitHub username)")?), None),
            FORWARD => (None, Some(self.required("Forward to (GitHub username)")?)),
            _ => (None, None),
        };

        let report = self
            .prompter
            .confirm("Create a report for this pull request?", defaults.report)?;

        Ok(PullRequestIntent {
            base: non_blank(Some(base.as_str())),
            title: title.and_then(|t| non_blank(Some(t.as_str()))),
            comment,
            report,
            forward,
            send_requested: send.is_some(),
            send,
            list: None,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::prompts::{Answer, ScriptedPrompter};

    fn defaults() -> IntentDefaults {
        IntentDefaults {
            base: "main".to_string(),
            title: Some("Add logging".to_string()),
            comment: Some("PTAL".to_string()),
            report: true,
        }
    }

    mod flags {
        use super::*;

        #[test]
        fn empty_flags_inherit_everything() {
            let intent = FlagIntents::for_pull_request(PullRequestFlags::default())
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent, PullRequestIntent::default());
        }

        #[test]
        fn no_comment_disables() {
            let flags = PullRequestFlags {
                no_comment: true,
                ..Default::default()
            };
            let intent = FlagIntents::for_pull_request(flags)
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent.comment, CommentChoice::Disabled);
        }

        #[test]
        fn no_report_wins() {
            let flags = PullRequestFlags {
                no_report: true,
                ..Default::default()
            };
            let intent = FlagIntents::for_pull_request(flags)
                .pull_request_intent(&defaults())
                .unwrap();
            assert!(!intent.report);
        }

        #[test]
        fn config_can_disable_reports() {
            let defaults = IntentDefaults {
                report: false,
                ..defaults()
            };
            let intent = FlagIntents::for_pull_request(PullRequestFlags::default())
                .pull_request_intent(&defaults)
                .unwrap();
            assert!(!intent.report);
        }

        #[test]
        fn bare_send_has_no_recipient() {
            let flags = PullRequestFlags {
                send: Some(None),
                ..Default::default()
            };
            let intent = FlagIntents::for_pull_request(flags)
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent.send, None);
            assert!(intent.send_requested);
        }

        #[test]
        fn bare_user_lists_everything() {
            let flags = PullRequestFlags {
                user: Some(None),
                ..Default::default()
            };
            let intent = FlagIntents::for_pull_request(flags)
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent.list, Some(FetchIntent { user: None }));
        }

        #[test]
        fn forward_and_send_pass_through_for_validation() {
            let flags = PullRequestFlags {
                forward: Some("alice".to_string()),
                send: Some(Some("bob".to_string())),
                ..Default::default()
            };
            let intent = FlagIntents::for_pull_request(flags)
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent.forward.as_deref(), Some("alice"));
            assert_eq!(intent.send.as_deref(), Some("bob"));
        }

        #[test]
        fn fetch_user_is_trimmed() {
            let source = FlagIntents::for_fetch(FetchIntent {
                user: Some("  ".to_string()),
            });
            assert_eq!(source.fetch_intent().unwrap(), FetchIntent { user: None });
            assert_eq!(source.mode(), Mode::Dry);
        }
    }

    mod prompted {
        use super::*;

        #[test]
        fn fetch_all() {
            let prompter = ScriptedPrompter::new([Answer::Select(0)]);
            let intent = PromptedIntents::new(&prompter).fetch_intent().unwrap();
            assert_eq!(intent, FetchIntent { user: None });
        }

        #[test]
        fn fetch_by_user() {
            let prompter =
                ScriptedPrompter::new([Answer::Select(1), Answer::Text("alice".to_string())]);
            let intent = PromptedIntents::new(&prompter).fetch_intent().unwrap();
            assert_eq!(intent.user.as_deref(), Some("alice"));
        }

        #[test]
        fn create_with_defaults() {
            let prompter = ScriptedPrompter::new([
                Answer::Select(CREATE),
                Answer::Default,
                Answer::Default,
                Answer::Default,
                Answer::Default,
                Answer::Default,
            ]);
            let intent = PromptedIntents::new(&prompter)
                .pull_request_intent(&defaults())
                .unwrap();

            assert_eq!(intent.base.as_deref(), Some("main"));
            assert_eq!(intent.title.as_deref(), Some("Add logging"));
            assert_eq!(intent.comment, CommentChoice::Text("PTAL".to_string()));
            assert!(intent.report);
            assert_eq!(intent.send, None);
            assert_eq!(intent.forward, None);
            assert!(prompter.is_exhausted());
        }

        #[test]
        fn declining_comment_disables_it() {
            let prompter = ScriptedPrompter::new([
                Answer::Select(CREATE),
                Answer::Default,
                Answer::Default,
                Answer::Confirm(false),
                Answer::Confirm(false),
            ]);
            let intent = PromptedIntents::new(&prompter)
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent.comment, CommentChoice::Disabled);
            assert!(!intent.report);
        }

        #[test]
        fn forward_skips_title_and_asks_target_until_answered() {
            let prompter = ScriptedPrompter::new([
                Answer::Select(FORWARD),
                Answer::Text("develop".to_string()),
                Answer::Confirm(false),
                Answer::Text(String::new()),
                Answer::Text("alice".to_string()),
                Answer::Default,
            ]);
            let intent = PromptedIntents::new(&prompter)
                .pull_request_intent(&defaults())
                .unwrap();

            assert_eq!(intent.base.as_deref(), Some("develop"));
            assert_eq!(intent.title, None);
            assert_eq!(intent.forward.as_deref(), Some("alice"));
            assert!(!prompter.asked().iter().any(|m| m == "Title"));
        }

        #[test]
        fn send_asks_for_recipient() {
            let prompter = ScriptedPrompter::new([
                Answer::Select(SEND),
                Answer::Default,
                Answer::Text("Improve docs".to_string()),
                Answer::Confirm(false),
                Answer::Text("bob".to_string()),
                Answer::Default,
            ]);
            let intent = PromptedIntents::new(&prompter)
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent.title.as_deref(), Some("Improve docs"));
            assert_eq!(intent.send.as_deref(), Some("bob"));
        }

        #[test]
        fn list_asks_only_for_filter() {
            let prompter =
                ScriptedPrompter::new([Answer::Select(LIST), Answer::Text(String::new())]);
            let intent = PromptedIntents::new(&prompter)
                .pull_request_intent(&defaults())
                .unwrap();
            assert_eq!(intent.list, Some(FetchIntent { user: None }));
            assert_eq!(prompter.asked().len(), 2);
        }

        #[test]
        fn cancelling_midway_is_an_error() {
            let prompter = ScriptedPrompter::new([Answer::Select(CREATE)]);
            let result = PromptedIntents::new(&prompter).pull_request_intent(&defaults());
            assert!(matches!(result, Err(WorkflowError::Prompt(_))));
        }
    }
}
