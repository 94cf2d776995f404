//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version` / `-V`: Show version
//! - `--verbose`: Trace git commands and API calls. It is removed from the
//!   argument list before clap runs (see [`super::strip_verbose`]), so it is
//!   accepted anywhere and never clashes with a command's own options.

use clap::{Args, Parser, Subcommand};

use crate::core::intent::FetchIntent;
use crate::engine::PullRequestFlags;

/// gitray - pull requests from the command line
#[derive(Parser, Debug)]
#[command(name = "gitray")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Pass --verbose anywhere to trace git commands and API calls.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Guided menu: pick a workflow and answer prompts
    #[command(
        name = "cli",
        long_about = "Guided menu.\n\n\
            Choose between the Pull Request and Fetch workflows, then answer a few \
            questions. Every answer has a sensible default taken from your configuration \
            and the current branch."
    )]
    Menu,

    /// Run or re-run the interactive configuration
    #[command(
        name = "config",
        long_about = "Run or re-run the interactive configuration.\n\n\
            Asks for the access token, the default base branch, the default review comment, \
            and whether to record reports. Current values are offered as defaults; leaving \
            the token empty keeps the stored one. The file is only replaced once every \
            question has been answered."
    )]
    Config,

    /// List open pull requests
    #[command(
        name = "fetch",
        after_help = "\
WORKFLOW EXAMPLES:
    # Everything open in this repository
    gitray fetch

    # Only pull requests opened by alice
    gitray fetch -u alice"
    )]
    Fetch(FetchArgs),

    /// Issue management (disabled)
    #[command(name = "issues")]
    Issues,

    /// Create, send, or forward a pull request
    #[command(
        name = "pr",
        long_about = "Create, send, or forward a pull request.\n\n\
            Without options, opens a pull request from the current branch into the default \
            base, titled after the branch name. --send opens it and requests a review from \
            a user; --forward hands your existing open pull request to someone else. \
            --user lists open pull requests instead.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Open a pull request from the current branch
    gitray pr -t \"Add logging\" -b main

    # Open it and ask bob to review, with a comment
    gitray pr -s bob -c \"Ready when you are\"

    # Hand your open pull request against main over to alice
    gitray pr -f alice -b main

    # List open pull requests by carol
    gitray pr -u carol"
    )]
    Pr(PrArgs),

    /// Update gitray itself
    #[command(
        name = "update",
        long_about = "Update gitray itself.\n\n\
            Fast-forwards gitray's own git checkout (GITRAY_HOME, or the checkout the \
            running binary was built in). Your current repository is not touched."
    )]
    Update,

    /// Sync your fork (origin) with the latest code from upstream
    #[command(
        name = "sync",
        long_about = "Sync your fork with upstream.\n\n\
            Fetches the 'upstream' remote and fast-forwards the current branch to \
            upstream's branch of the same name. If the branch has diverged, nothing is \
            changed and you are asked to merge or rebase yourself."
    )]
    Sync,
}

/// Options for `fetch`.
#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Only list pull requests opened by this user
    #[arg(short, long, value_name = "USER")]
    pub user: Option<String>,
}

impl From<FetchArgs> for FetchIntent {
    fn from(args: FetchArgs) -> Self {
        FetchIntent { user: args.user }
    }
}

/// Options for `pr`.
#[derive(Args, Debug, Default)]
pub struct PrArgs {
    /// Base branch (default: configured default_base, else main)
    #[arg(short, long, value_name = "BRANCH")]
    pub base: Option<String>,

    /// Review comment to attach
    #[arg(short, long, value_name = "TEXT", conflicts_with = "no_comment")]
    pub comment: Option<String>,

    /// Attach no review comment, not even the configured default
    #[arg(long)]
    pub no_comment: bool,

    /// Don't record a report for this pull request
    #[arg(long)]
    pub no_report: bool,

    /// Forward your open pull request to this user
    #[arg(short, long, value_name = "USER")]
    pub forward: Option<String>,

    /// Open the pull request and request a review from this user
    #[arg(short, long, value_name = "USER", num_args = 0..=1)]
    pub send: Option<Option<String>>,

    /// Pull request title (default: derived from the branch name)
    #[arg(short, long, value_name = "TITLE")]
    pub title: Option<String>,

    /// List open pull requests, optionally only those by this user
    #[arg(short, long, value_name = "USER", num_args = 0..=1)]
    pub user: Option<Option<String>>,
}

impl From<PrArgs> for PullRequestFlags {
    fn from(args: PrArgs) -> Self {
        PullRequestFlags {
            base: args.base,
            title: args.title,
            comment: args.comment,
            no_comment: args.no_comment,
            no_report: args.no_report,
            forward: args.forward,
            send: args.send,
            user: args.user,
        }
    }
}
