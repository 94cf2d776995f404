//! cli::commands::issues
//!
//! Placeholder for issue management.

use anyhow::Result;

use crate::ui::output;

/// Message shown instead of running anything.
pub const DISABLED_NOTICE: &str = "Issue management is disabled for now.";

/// Run the issues command.
pub fn issues() -> Result<()> {
    output::print(DISABLED_NOTICE);
    Ok(())
}
