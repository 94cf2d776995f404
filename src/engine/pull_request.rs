//! engine::pull_request
//!
//! Pull-Request workflow: create, send, or forward a pull request.
//!
//! # Execution
//!
//! - Forward: find the current user's open pull request against the base
//!   (preferring the one for the current branch) and request a review from
//!   the target. No match is [`ForgeError::NotFound`].
//! - Send: create the pull request, then request a review from the recipient.
//! - Create: create the pull request.
//!
//! A review comment is attached afterwards if one resolved, then a report is
//! emitted if requested. Once the pull request exists, a failing follow-up
//! step ends the run with [`WorkflowError::Incomplete`]; nothing is undone.

use crate::core::intent::{PlannedAction, PullRequestPlan, Resolution};
use crate::forge::{CreatePrRequest, ForgeError, PullRequestFilter, PullRequestRecord};
use crate::ui::output;

use super::context::ApplicationContext;
use super::fetch;
use super::intent::IntentSource;
use super::report::{emit_best_effort, ReportOutcome, ReportRecord};
use super::WorkflowError;

/// What was done to the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Created,
    Sent { to: String },
    Forwarded { to: String },
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestOutcome {
    pub pull_request: PullRequestRecord,
    pub delivery: Delivery,
    /// Comment attached, if any
    pub comment: Option<String>,
    pub report: ReportOutcome,
}

/// Run the Pull-Request workflow end to end.
pub async fn pull_request_workflow(
    ctx: &ApplicationContext,
    source: &dyn IntentSource,
) -> Result<(), WorkflowError> {
    // Resolving
    let head = ctx.current_branch()?;
    let defaults = ctx.intent_defaults(head.as_deref());
    let intent = source.pull_request_intent(&defaults)?;
    log::debug!("pull request ({:?} mode): {:?}", source.mode(), intent);

    match intent.resolve(&ctx.config, head.as_deref())? {
        Resolution::List(fetch_intent) => {
            let records = fetch::list_open(ctx, &fetch_intent).await?;
            output::print(fetch::render(&ctx.identity, &fetch_intent, &records));
        }
        Resolution::Change(plan) => {
            let outcome = execute(ctx, plan).await?;
            output::success(render(&outcome));
        }
    }

    Ok(())
}

/// Executing state: apply a resolved plan.
pub async fn execute(
    ctx: &ApplicationContext,
    plan: PullRequestPlan,
) -> Result<PullRequestOutcome, WorkflowError> {
    let PullRequestPlan {
        action,
        base,
        comment,
        report,
    } = plan;

    let (pull_request, delivery) = match action {
        PlannedAction::Create {
            head,
            title,
            recipient,
        } => {
            let pr = ctx
                .forge
                .create_pull_request(CreatePrRequest {
                    head,
                    base,
                    title,
                    body: None,
                })
                .await?;
            log::info!("created pull request #{}", pr.number);

            match recipient {
                Some(to) => {
                    ctx.forge
                        .forward_pull_request(pr.number, &to)
                        .await
                        .map_err(|e| incomplete(&pr, "created", format!("sending it to @{}", to), e))?;
                    (pr, Delivery::Sent { to })
                }
                None => (pr, Delivery::Created),
            }
        }
        PlannedAction::Forward { to, head } => {
            let pr = find_own_pull_request(ctx, &base, head.as_deref()).await?;
            ctx.forge.forward_pull_request(pr.number, &to).await?;
            log::info!("forwarded pull request #{} to {}", pr.number, to);
            (pr, Delivery::Forwarded { to })
        }
    };

    if let Some(text) = &comment {
        let done = match delivery {
            Delivery::Forwarded { .. } => "forwarded",
            _ => "created",
        };
        ctx.forge
            .add_review_comment(pull_request.number, text)
            .await
            .map_err(|e| incomplete(&pull_request, done, "attaching the review comment".to_string(), e))?;
    }

    let report = if report {
        let record = ReportRecord::new(&ctx.identity, &pull_request);
        emit_best_effort(ctx.reporter.as_ref(), &record)
    } else {
        ReportOutcome::Skipped
    };

    Ok(PullRequestOutcome {
        pull_request,
        delivery,
        comment,
        report,
    })
}

/// The current user's open pull request against `base`.
///
/// Prefers the one whose head is `head`; otherwise the most recent.
async fn find_own_pull_request(
    ctx: &ApplicationContext,
    base: &str,
    head: Option<&str>,
) -> Result<PullRequestRecord, WorkflowError> {
    let user = ctx.forge.authenticated_user().await?;
    let candidates = ctx
        .forge
        .list_pull_requests(&PullRequestFilter {
            author: Some(user.clone()),
            base: Some(base.to_string()),
        })
        .await?;

    let on_branch = head.and_then(|h| candidates.iter().find(|pr| pr.head == h).cloned());
    let chosen = on_branch.or_else(|| candidates.into_iter().max_by_key(|pr| pr.number));

    chosen.ok_or_else(|| {
        ForgeError::NotFound(format!(
            "no open pull request by @{} against '{}' to forward",
            user, base
        ))
        .into()
    })
}

fn incomplete(
    pr: &PullRequestRecord,
    done: &'static str,
    step: String,
    source: ForgeError,
) -> WorkflowError {
    WorkflowError::Incomplete {
        number: pr.number,
        url: pr.url.clone(),
        done,
        step,
        source,
    }
}

/// Reporting state: describe the outcome for the console.
pub fn render(outcome: &PullRequestOutcome) -> String {
    let pr = &outcome.pull_request;
    let verb = match outcome.delivery {
        Delivery::Forwarded { .. } => "Forwarded",
        _ => "Created",
    };

    let mut lines = vec![
        format!("{} pull request #{}: {}", verb, pr.number, pr.title),
        format!("  {}", pr.url),
        format!("  {} <- {}", pr.base, pr.head),
    ];

    match &outcome.delivery {
        Delivery::Sent { to } => lines.push(format!("Review requested from @{}.", to)),
        Delivery::Forwarded { to } => lines.push(format!("Handed over to @{} for review.", to)),
        Delivery::Created => {}
    }

    if outcome.comment.is_some() {
        lines.push("Review comment attached.".to_string());
    }

    match &outcome.report {
        ReportOutcome::Emitted => lines.push("Report recorded.".to_string()),
        ReportOutcome::Skipped => {}
        ReportOutcome::Failed(reason) => lines.push(format!("Report not recorded: {}", reason)),
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::PrState;

    fn outcome(delivery: Delivery, comment: Option<&str>, report: ReportOutcome) -> PullRequestOutcome {
        PullRequestOutcome {
            pull_request: PullRequestRecord {
                number: 7,
                title: "Add logging".to_string(),
                base: "main".to_string(),
                head: "feature/log".to_string(),
                author: "alice".to_string(),
                state: PrState::Open,
                url: "https://github.com/octo/gitray/pull/7".to_string(),
            },
            delivery,
            comment: comment.map(String::from),
            report,
        }
    }

    #[test]
    fn render_plain_create() {
        assert_eq!(
            render(&outcome(Delivery::Created, None, ReportOutcome::Skipped)),
            "Created pull request #7: Add logging\n  https://github.com/octo/gitray/pull/7\n  main <- feature/log"
        );
    }

    #[test]
    fn render_send_with_comment_and_report() {
        let text = render(&outcome(
            Delivery::Sent {
                to: "bob".to_string(),
            },
            Some("PTAL"),
            ReportOutcome::Emitted,
        ));
        assert!(text.contains("Review requested from @bob."));
        assert!(text.contains("Review comment attached."));
        assert!(text.ends_with("Report recorded."));
    }

    #[test]
    fn render_forward_with_failed_report() {
        let text = render(&outcome(
            Delivery::Forwarded {
                to: "alice".to_string(),
            },
            None,
            ReportOutcome::Failed("disk full".to_string()),
        ));
        assert!(text.starts_with("Forwarded pull request #7"));
        assert!(text.contains("Report not recorded: disk full"));
    }
}
