//! cli
//!
//! Command-line interface layer for gitray.
//!
//! # Responsibilities
//!
//! - Strip the global `--verbose` flag and set up logging
//! - Parse arguments and delegate to command handlers
//! - Print errors, with a hint when one applies
//!
//! The layer is thin. Every workflow runs in [`crate::engine`]; handlers only
//! wire up a context and a mode.

pub mod args;
pub mod commands;
pub mod logging;

pub use args::{Cli, Command};

use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;

use crate::engine::WorkflowError;
use crate::ui::output;

/// Global flag removed from the arguments before parsing.
pub const VERBOSE_FLAG: &str = "--verbose";

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> ExitCode {
    let (args, verbose) = strip_verbose(std::env::args_os());
    logging::init(verbose);

    let cli = Cli::parse_from(args);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Remove every `--verbose` ahead of a `--` separator.
///
/// Returns the remaining arguments and whether the flag was present.
pub fn strip_verbose<I>(args: I) -> (Vec<OsString>, bool)
where
    I: IntoIterator<Item = OsString>,
{
    let mut verbose = false;
    let mut passthrough = false;
    let mut kept = Vec::new();

    for arg in args {
        if !passthrough {
            if arg == VERBOSE_FLAG {
                verbose = true;
                continue;
            }
            if arg == "--" {
                passthrough = true;
            }
        }
        kept.push(arg);
    }

    (kept, verbose)
}

fn report_error(err: &anyhow::Error) {
    // Messages already embed their causes
    output::error(err);

    let hint = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<WorkflowError>())
        .and_then(WorkflowError::guidance);
    if let Some(hint) = hint {
        output::hint(hint);
    }
}
