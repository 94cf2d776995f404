//! cli::commands::fetch
//!
//! List open pull requests (Dry mode).
//!
//! # Example
//!
//! ```bash
//! gitray fetch
//! gitray fetch -u alice
//! ```

use std::path::Path;

use anyhow::Result;

use crate::cli::args::FetchArgs;
use crate::core::config::ConfigStore;
use crate::engine::{bootstrap, fetch_workflow, FlagIntents, WorkflowError};
use crate::ui::prompts::TerminalPrompter;

use super::runtime;

/// Run the fetch command.
pub fn fetch(cwd: &Path, args: FetchArgs) -> Result<()> {
    runtime()?.block_on(fetch_async(cwd, args))
}

async fn fetch_async(cwd: &Path, args: FetchArgs) -> Result<()> {
    let store = ConfigStore::new().map_err(WorkflowError::from)?;
    let prompter = TerminalPrompter::new();
    let ctx = bootstrap(cwd, &store, &prompter).await?;

    fetch_workflow(&ctx, &FlagIntents::for_fetch(args.into())).await?;
    Ok(())
}
