//! cli::logging
//!
//! Logger setup.
//!
//! Normal runs only show warnings, without timestamps or targets, so a
//! failed report reads like any other notice. `--verbose` turns on debug
//! records for gitray itself, which traces every git command and API call.
//! `RUST_LOG` overrides both.

use env_logger::{Builder, Env};

/// Initialise the global logger. Later calls are ignored.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "warn,gitray=debug" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None).format_target(false);
    }

    let _ = builder.try_init();
}
