//! cli::commands::config_cmd
//!
//! Re-run the interactive configuration.
//!
//! Current values are offered as defaults. A config file that no longer
//! parses is not an error here, since this is how it gets repaired. Nothing
//! is written until every question has been answered.

use anyhow::Result;

use crate::core::config::ConfigStore;
use crate::engine::WorkflowError;
use crate::ui::prompts::TerminalPrompter;

/// Run the config command.
pub fn config() -> Result<()> {
    let store = ConfigStore::new().map_err(WorkflowError::from)?;
    let current = store.load_for_editing().map_err(WorkflowError::from)?;
    log::debug!("configuring {}", store.path().display());

    store
        .ask_configuration(&current, &TerminalPrompter::new())
        .map_err(WorkflowError::from)?;
    Ok(())
}
