//! cli::commands::update
//!
//! Fast-forward gitray's own checkout.

use anyhow::Result;

use crate::engine::maintenance;
use crate::ui::output;

use super::runtime;

/// Run the update command.
pub fn update() -> Result<()> {
    let (dir, outcome) = runtime()?.block_on(maintenance::update())?;
    output::success(maintenance::render_update(&dir, &outcome));
    Ok(())
}
