//! cli::commands::sync
//!
//! Sync the fork (origin) with upstream.
//!
//! Fetches the `upstream` remote and fast-forwards the current branch. A
//! diverged branch is left alone and reported as a conflict.
//!
//! # Example
//!
//! ```bash
//! git remote add upstream https://github.com/original/project.git
//! gitray sync
//! ```

use std::path::Path;

use anyhow::Result;

use crate::engine::maintenance;
use crate::ui::output;

use super::runtime;

/// Run the sync command.
pub fn sync(cwd: &Path) -> Result<()> {
    let outcome = runtime()?.block_on(maintenance::sync(cwd))?;
    output::success(maintenance::render_sync(&outcome));
    Ok(())
}
