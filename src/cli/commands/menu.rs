//! cli::commands::menu
//!
//! The guided `cli` command (Onboard mode).

use std::path::Path;

use anyhow::Result;

use crate::core::config::ConfigStore;
use crate::engine::{bootstrap, guided, WorkflowError};
use crate::ui::prompts::TerminalPrompter;

use super::runtime;

/// Run the guided menu.
pub fn menu(cwd: &Path) -> Result<()> {
    runtime()?.block_on(menu_async(cwd))
}

async fn menu_async(cwd: &Path) -> Result<()> {
    let store = ConfigStore::new().map_err(WorkflowError::from)?;
    let prompter = TerminalPrompter::new();
    let ctx = bootstrap(cwd, &store, &prompter).await?;

    guided(&ctx, &prompter).await?;
    Ok(())
}
