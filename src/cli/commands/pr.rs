//! cli::commands::pr
//!
//! Create, send, forward, or list pull requests (Dry mode).
//!
//! Flag combinations are validated by the engine before any API call, so a
//! rejected `pr` leaves the forge untouched.
//!
//! # Example
//!
//! ```bash
//! gitray pr -t "Add logging" -b main
//! gitray pr -s bob -c "Ready for review"
//! gitray pr -f alice
//! gitray pr -u
//! ```

use std::path::Path;

use anyhow::Result;

use crate::cli::args::PrArgs;
use crate::core::config::ConfigStore;
use crate::engine::{bootstrap, pull_request_workflow, FlagIntents, WorkflowError};
use crate::ui::prompts::TerminalPrompter;

use super::runtime;

/// Run the pr command.
pub fn pr(cwd: &Path, args: PrArgs) -> Result<()> {
    runtime()?.block_on(pr_async(cwd, args))
}

async fn pr_async(cwd: &Path, args: PrArgs) -> Result<()> {
    let store = ConfigStore::new().map_err(WorkflowError::from)?;
    let prompter = TerminalPrompter::new();
    let ctx = bootstrap(cwd, &store, &prompter).await?;

    pull_request_workflow(&ctx, &FlagIntents::for_pull_request(args.into())).await?;
    Ok(())
}
