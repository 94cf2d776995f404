//! Integration tests for the workflow orchestrator.
//!
//! Workflows run against a real git repository and a [`MockForge`], with
//! Onboard mode driven by a [`ScriptedPrompter`]. The end-to-end bootstrap
//! test talks to a local wiremock server instead of the mock.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitray::core::config::{Config, ConfigStore};
use gitray::core::intent::{FetchIntent, IntentError, PullRequestIntent, Resolution};
use gitray::core::types::RemoteIdentity;
use gitray::engine::pull_request::{execute, Delivery};
use gitray::engine::{
    bootstrap, fetch, fetch_workflow, guided, pull_request_workflow, ApplicationContext,
    FlagIntents, JsonLinesReporter, PullRequestFlags, ReportError, ReportOutcome, ReportRecord,
    Reporter, WorkflowError,
};
use gitray::forge::mock::{FailOn, MockForge, MockOperation};
use gitray::forge::{ForgeError, PrState, PullRequestRecord};
use gitray::ui::prompts::{Answer, ScriptedPrompter};

/// A repository checked out on `branch`, plus a directory for reports.
struct Workspace {
    dir: TempDir,
    repo: PathBuf,
}

impl Workspace {
    fn on_branch(branch: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo = dir.path().join("repo");
        std::fs::create_dir(&repo).unwrap();

        run_git(&repo, &["init"]);
        run_git(&repo, &["symbolic-ref", "HEAD", &format!("refs/heads/{}", branch)]);
        run_git(
            &repo,
            &["remote", "add", "origin", "git@github.com:octo/gitray.git"],
        );

        Self { dir, repo }
    }

    fn reports_path(&self) -> PathBuf {
        self.dir.path().join("reports.jsonl")
    }

    fn reports(&self) -> Vec<serde_json::Value> {
        match std::fs::read_to_string(self.reports_path()) {
            Ok(contents) => contents
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn context(&self, config: Config, forge: &MockForge) -> ApplicationContext {
        self.context_with_reporter(config, forge, Arc::new(JsonLinesReporter::new(self.reports_path())))
    }

    fn context_with_reporter(
        &self,
        config: Config,
        forge: &MockForge,
        reporter: Arc<dyn Reporter>,
    ) -> ApplicationContext {
        ApplicationContext::new(
            config,
            RemoteIdentity::new("octo", "gitray"),
            Arc::new(forge.clone()),
            reporter,
            &self.repo,
        )
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn config() -> Config {
    Config {
        token: "ghp_testtoken1234567890".to_string(),
        ..Config::default()
    }
}

fn open_pr(number: u64, author: &str, head: &str, base: &str) -> PullRequestRecord {
    PullRequestRecord {
        number,
        title: format!("PR {}", number),
        base: base.to_string(),
        head: head.to_string(),
        author: author.to_string(),
        state: PrState::Open,
        url: format!("https://github.com/octo/gitray/pull/{}", number),
    }
}

fn dry(flags: PullRequestFlags) -> FlagIntents {
    FlagIntents::for_pull_request(flags)
}

struct BrokenReporter;

impl Reporter for BrokenReporter {
    fn emit(&self, _record: &ReportRecord) -> Result<(), ReportError> {
        Err(ReportError::Encode("disk unavailable".to_string()))
    }
}

// =============================================================================
// Dry mode: pull requests
// =============================================================================

#[tokio::test]
async fn create_with_title_and_base_records_a_report() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context(config(), &forge);

    pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            title: Some("Add logging".to_string()),
            base: Some("main".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    let prs = forge.all_prs();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].head, "feature/log");
    assert_eq!(prs[0].base, "main");
    assert_eq!(prs[0].title, "Add logging");
    assert!(forge.comments().is_empty());
    assert!(forge.reviewers().is_empty());

    let reports = ws.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["repository"], "octo/gitray");
    assert_eq!(reports[0]["number"], 1);
    assert_eq!(reports[0]["title"], "Add logging");
}

#[tokio::test]
async fn defaults_come_from_config_and_branch() {
    let ws = Workspace::on_branch("feature/add-log_rotation");
    let forge = MockForge::new();
    let ctx = ws.context(
        Config {
            default_base: Some("develop".to_string()),
            default_comment: Some("PTAL".to_string()),
            ..config()
        },
        &forge,
    );

    pull_request_workflow(&ctx, &dry(PullRequestFlags::default()))
        .await
        .unwrap();

    let prs = forge.all_prs();
    assert_eq!(prs[0].base, "develop");
    assert_eq!(prs[0].title, "Add log rotation");
    assert_eq!(forge.comments(), vec![(1, "PTAL".to_string())]);
}

#[tokio::test]
async fn no_comment_suppresses_the_configured_default() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context(
        Config {
            default_comment: Some("PTAL".to_string()),
            ..config()
        },
        &forge,
    );

    pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            no_comment: true,
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(forge.all_prs().len(), 1);
    assert!(forge.comments().is_empty());
}

#[tokio::test]
async fn no_report_skips_the_report() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context(config(), &forge);

    pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            no_report: true,
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(forge.all_prs().len(), 1);
    assert!(ws.reports().is_empty());
}

#[tokio::test]
async fn send_creates_then_requests_review() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context(config(), &forge);

    pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            send: Some(Some("bob".to_string())),
            comment: Some("Ready when you are".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(forge.reviewers(), vec![(1, "bob".to_string())]);
    assert_eq!(forge.comments(), vec![(1, "Ready when you are".to_string())]);

    let ops = forge.operations();
    let created = ops
        .iter()
        .position(|op| matches!(op, MockOperation::CreatePullRequest { .. }));
    let forwarded = ops
        .iter()
        .position(|op| matches!(op, MockOperation::ForwardPullRequest { .. }));
    assert!(created < forwarded);
}

#[tokio::test]
async fn forward_and_send_together_make_no_forge_calls() {
    // A bare --send still conflicts with --forward
    for send in [Some("bob".to_string()), None] {
        let ws = Workspace::on_branch("feature/log");
        let forge = MockForge::new();
        let ctx = ws.context(config(), &forge);

        let result = pull_request_workflow(
            &ctx,
            &dry(PullRequestFlags {
                forward: Some("alice".to_string()),
                send: Some(send.clone()),
                ..Default::default()
            }),
        )
        .await;

        assert!(
            matches!(
                result,
                Err(WorkflowError::Intent(IntentError::Conflicting { .. }))
            ),
            "send = {:?}",
            send
        );
        assert!(forge.operations().is_empty());
        assert!(ws.reports().is_empty());
    }
}

#[tokio::test]
async fn opening_from_the_base_branch_is_rejected() {
    let ws = Workspace::on_branch("main");
    let forge = MockForge::new();
    let ctx = ws.context(config(), &forge);

    let result = pull_request_workflow(&ctx, &dry(PullRequestFlags::default())).await;

    assert!(matches!(
        result,
        Err(WorkflowError::Intent(IntentError::HeadIsBase(_)))
    ));
    assert!(forge.operations().is_empty());
}

#[tokio::test]
async fn user_flag_lists_instead_of_creating() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::with_prs(vec![open_pr(3, "carol", "c", "main")]);
    let ctx = ws.context(config(), &forge);

    pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            user: Some(Some("carol".to_string())),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(
        forge.operations(),
        vec![MockOperation::ListPullRequests {
            author: Some("carol".to_string()),
            base: None,
        }]
    );
    assert_eq!(forge.all_prs().len(), 1);
}

// =============================================================================
// Forwarding
// =============================================================================

#[tokio::test]
async fn forward_prefers_the_current_branch() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::with_prs(vec![
        open_pr(4, "octocat", "feature/log", "main"),
        open_pr(7, "octocat", "feature/other", "main"),
        open_pr(9, "someone", "feature/log", "main"),
    ]);
    let ctx = ws.context(config(), &forge);

    pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            forward: Some("alice".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(forge.reviewers(), vec![(4, "alice".to_string())]);
    assert_eq!(forge.all_prs().len(), 3);
}

#[tokio::test]
async fn forward_falls_back_to_the_latest_pull_request() {
    let ws = Workspace::on_branch("feature/unrelated");
    let forge = MockForge::with_prs(vec![
        open_pr(4, "octocat", "feature/a", "main"),
        open_pr(7, "octocat", "feature/b", "main"),
        open_pr(8, "octocat", "feature/c", "develop"),
    ]);
    let ctx = ws.context(config(), &forge);

    pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            forward: Some("alice".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(forge.reviewers(), vec![(7, "alice".to_string())]);
}

#[tokio::test]
async fn forward_without_an_open_pull_request() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::with_prs(vec![open_pr(2, "someone", "feature/log", "main")]);
    let ctx = ws.context(config(), &forge);

    let result = pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            forward: Some("alice".to_string()),
            ..Default::default()
        }),
    )
    .await;

    assert!(matches!(
        result,
        Err(WorkflowError::Forge(ForgeError::NotFound(_)))
    ));
    assert!(forge.reviewers().is_empty());
    assert!(ws.reports().is_empty());
}

// =============================================================================
// Partial failures
// =============================================================================

#[tokio::test]
async fn failed_report_does_not_fail_the_run() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context_with_reporter(config(), &forge, Arc::new(BrokenReporter));

    pull_request_workflow(&ctx, &dry(PullRequestFlags::default()))
        .await
        .unwrap();
    assert_eq!(forge.all_prs().len(), 1);
}

#[tokio::test]
async fn failed_report_is_visible_in_the_outcome() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context_with_reporter(config(), &forge, Arc::new(BrokenReporter));

    let plan = match PullRequestIntent::default()
        .resolve(&ctx.config, Some("feature/log"))
        .unwrap()
    {
        Resolution::Change(plan) => plan,
        other => panic!("expected a change, got {:?}", other),
    };

    let outcome = execute(&ctx, plan).await.unwrap();
    assert_eq!(outcome.delivery, Delivery::Created);
    assert!(matches!(outcome.report, ReportOutcome::Failed(_)));
}

#[tokio::test]
async fn failed_comment_leaves_the_pull_request_open() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new().fail_on(FailOn::AddReviewComment(ForgeError::Forbidden(
        "no access".to_string(),
    )));
    let ctx = ws.context(config(), &forge);

    let result = pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            comment: Some("PTAL".to_string()),
            ..Default::default()
        }),
    )
    .await;

    match result {
        Err(WorkflowError::Incomplete { number, done, .. }) => {
            assert_eq!(number, 1);
            assert_eq!(done, "created");
        }
        other => panic!("expected Incomplete, got {:?}", other),
    }
    assert_eq!(forge.all_prs().len(), 1);
    assert!(ws.reports().is_empty());
}

#[tokio::test]
async fn failed_create_stops_before_any_follow_up() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new().fail_on(FailOn::CreatePullRequest(ForgeError::Unauthorized(
        "Bad credentials".to_string(),
    )));
    let ctx = ws.context(config(), &forge);

    let err = pull_request_workflow(
        &ctx,
        &dry(PullRequestFlags {
            send: Some(Some("bob".to_string())),
            ..Default::default()
        }),
    )
    .await
    .unwrap_err();

    assert!(err.guidance().unwrap().contains("gitray config"));
    assert!(forge.reviewers().is_empty());
}

// =============================================================================
// Fetch
// =============================================================================

#[tokio::test]
async fn fetch_lists_in_number_order() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::with_prs(vec![
        open_pr(5, "alice", "a", "main"),
        open_pr(2, "bob", "b", "main"),
        open_pr(9, "alice", "c", "main"),
    ]);
    let ctx = ws.context(config(), &forge);

    let all = fetch::list_open(&ctx, &FetchIntent::default()).await.unwrap();
    let numbers: Vec<u64> = all.iter().map(|pr| pr.number).collect();
    assert_eq!(numbers, vec![2, 5, 9]);

    let by_alice = fetch::list_open(
        &ctx,
        &FetchIntent {
            user: Some("alice".to_string()),
        },
    )
    .await
    .unwrap();
    let numbers: Vec<u64> = by_alice.iter().map(|pr| pr.number).collect();
    assert_eq!(numbers, vec![5, 9]);
}

#[tokio::test]
async fn fetch_workflow_uses_the_user_filter() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context(config(), &forge);

    fetch_workflow(
        &ctx,
        &FlagIntents::for_fetch(FetchIntent {
            user: Some("alice".to_string()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(
        forge.operations(),
        vec![MockOperation::ListPullRequests {
            author: Some("alice".to_string()),
            base: None,
        }]
    );
}

// =============================================================================
// Onboard mode
// =============================================================================

#[tokio::test]
async fn guided_create_with_all_defaults() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context(config(), &forge);
    let prompter = ScriptedPrompter::new([
        Answer::Select(0), // Pull Request
        Answer::Select(0), // create
        Answer::Default,   // base
        Answer::Default,   // title
        Answer::Default,   // comment?
        Answer::Default,   // report?
    ]);

    guided(&ctx, &prompter).await.unwrap();

    let prs = forge.all_prs();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].base, "main");
    assert_eq!(prs[0].title, "Log");
    assert!(prompter.is_exhausted());
    assert_eq!(ws.reports().len(), 1);
}

#[tokio::test]
async fn guided_fetch_by_user() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::with_prs(vec![
        open_pr(1, "alice", "a", "main"),
        open_pr(2, "bob", "b", "main"),
    ]);
    let ctx = ws.context(config(), &forge);
    let prompter = ScriptedPrompter::new([
        Answer::Select(1),
        Answer::Select(1),
        Answer::Text("bob".to_string()),
    ]);

    guided(&ctx, &prompter).await.unwrap();

    assert_eq!(
        forge.operations(),
        vec![MockOperation::ListPullRequests {
            author: Some("bob".to_string()),
            base: None,
        }]
    );
}

#[tokio::test]
async fn guided_cancel_changes_nothing() {
    let ws = Workspace::on_branch("feature/log");
    let forge = MockForge::new();
    let ctx = ws.context(config(), &forge);
    let prompter = ScriptedPrompter::new([Answer::Select(0), Answer::Select(0)]);

    let result = guided(&ctx, &prompter).await;

    assert!(matches!(result, Err(WorkflowError::Prompt(_))));
    assert!(forge.operations().is_empty());
}

// =============================================================================
// Bootstrap
// =============================================================================

#[tokio::test]
async fn bootstrap_outside_a_repository() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::with_path(dir.path().join("config.toml"));
    let prompter = ScriptedPrompter::new([]);

    let result = bootstrap(dir.path(), &store, &prompter).await;

    assert!(matches!(result, Err(WorkflowError::NotAGitRepository)));
    assert!(prompter.asked().is_empty());
}

#[tokio::test]
async fn first_run_setup_then_fetch_against_local_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/gitray/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let ws = Workspace::on_branch("feature/log");
    let store = ConfigStore::with_path(ws.dir.path().join("gitray").join("config.toml"));
    store
        .save(&Config {
            api_base: Some(server.uri()),
            ..Config::default()
        })
        .unwrap();

    // Stored config has no token yet, so setup runs first
    let prompter = ScriptedPrompter::new([
        Answer::Text("ghp_testtoken1234567890".to_string()),
        Answer::Default,
        Answer::Default,
        Answer::Default,
    ]);

    let ctx = bootstrap(&ws.repo, &store, &prompter).await.unwrap();
    assert!(prompter.is_exhausted());
    assert_eq!(ctx.identity, RemoteIdentity::new("octo", "gitray"));
    assert_eq!(ctx.config.token, "ghp_testtoken1234567890");
    assert_eq!(store.load().unwrap(), Some(ctx.config.clone()));

    let records = fetch::list_open(&ctx, &FetchIntent::default()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn bootstrap_requires_an_origin_remote() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("repo");
    std::fs::create_dir(&repo).unwrap();
    run_git(&repo, &["init"]);

    let store = ConfigStore::with_path(dir.path().join("config.toml"));
    store.save(&config()).unwrap();

    let result = bootstrap(&repo, &store, &ScriptedPrompter::new([])).await;
    assert!(matches!(result, Err(WorkflowError::Git(_))));
}
