//! engine::fetch
//!
//! Fetch workflow: list open pull requests for the repository.
//!
//! Output is ordered by pull request number, ascending, regardless of the
//! order the forge returns records in.

use crate::core::intent::FetchIntent;
use crate::core::types::RemoteIdentity;
use crate::forge::{PullRequestFilter, PullRequestRecord};
use crate::ui::output;

use super::context::ApplicationContext;
use super::intent::IntentSource;
use super::WorkflowError;

/// Run the Fetch workflow end to end.
pub async fn fetch_workflow(
    ctx: &ApplicationContext,
    source: &dyn IntentSource,
) -> Result<(), WorkflowError> {
    let intent = source.fetch_intent()?;
    log::debug!("fetch ({:?} mode): {:?}", source.mode(), intent);

    let records = list_open(ctx, &intent).await?;
    output::print(render(&ctx.identity, &intent, &records));
    Ok(())
}

/// List open pull requests matching the intent, sorted by number.
pub async fn list_open(
    ctx: &ApplicationContext,
    intent: &FetchIntent,
) -> Result<Vec<PullRequestRecord>, WorkflowError> {
    let filter = PullRequestFilter {
        author: intent.user.clone(),
        base: None,
    };

    let mut records = ctx.forge.list_pull_requests(&filter).await?;
    records.sort_by_key(|pr| pr.number);
    Ok(records)
}

/// Render a listing for the console.
pub fn render(identity: &RemoteIdentity, intent: &FetchIntent, records: &[PullRequestRecord]) -> String {
    let scope = match &intent.user {
        Some(user) => format!("{} by @{}", identity, user),
        None => identity.to_string(),
    };

    if records.is_empty() {
        return format!("No open pull requests in {}.", scope);
    }

    let rows: Vec<String> = records.iter().map(output::pull_request_row).collect();
    format!(
        "Open pull requests in {} ({}):\n{}",
        scope,
        records.len(),
        output::format_list(&rows, "  ")
    )
}
