//! engine::menu
//!
//! The guided entry point behind `gitray cli`.

use crate::ui::prompts::Prompter;

use super::context::ApplicationContext;
use super::fetch::fetch_workflow;
use super::intent::PromptedIntents;
use super::pull_request::pull_request_workflow;
use super::WorkflowError;

/// Workflows offered by the guided menu.
pub const WORKFLOWS: [&str; 2] = ["Pull Request", "Fetch"];

/// Ask which workflow to run, then run it in Onboard mode.
pub async fn guided(ctx: &ApplicationContext, prompter: &dyn Prompter) -> Result<(), WorkflowError> {
    let source = PromptedIntents::new(prompter);

    match prompter.select("Which workflow?", &WORKFLOWS, 0)? {
        0 => pull_request_workflow(ctx, &source).await,
        _ => fetch_workflow(ctx, &source).await,
    }
}
