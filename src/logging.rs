//! Log subscriber setup for tools built on fsport
//!
//! The library itself only emits `tracing` events. A binary that wants to see
//! them calls [`init_logging`] once at startup.

use anyhow::{anyhow, Result};
use tracing::Level;

/// Maximum log level for a verbosity count and quiet flag
///
/// Quiet wins over any verbosity.
#[must_use]
pub const fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a formatting subscriber writing to stderr
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
