//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Every command first checks that the working directory is inside a git
//! repository. Handlers that talk to the forge build a context with
//! [`crate::engine::bootstrap`] and run on a single-threaded tokio runtime;
//! the rest stay synchronous.

mod config_cmd;
mod fetch;
mod issues;
mod menu;
mod pr;
mod sync;
mod update;

pub use config_cmd::config;
pub use fetch::fetch;
pub use issues::issues;
pub use menu::menu;
pub use pr::pr;
pub use sync::sync;
pub use update::update;

use std::path::Path;

use anyhow::Result;
use tokio::runtime::Runtime;

use crate::cli::args::Command;
use crate::engine;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command) -> Result<()> {
    let cwd = std::env::current_dir()?;
    dispatch_in(command, &cwd)
}

/// Dispatch a command as if started in `cwd`.
pub fn dispatch_in(command: Command, cwd: &Path) -> Result<()> {
    engine::ensure_git_repository(cwd)?;

    match command {
        Command::Menu => menu::menu(cwd),
        Command::Config => config_cmd::config(),
        Command::Fetch(args) => fetch::fetch(cwd, args),
        Command::Issues => issues::issues(),
        Command::Pr(args) => pr::pr(cwd, args),
        Command::Update => update::update(),
        Command::Sync => sync::sync(cwd),
    }
}

/// Runtime for one command.
fn runtime() -> Result<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
