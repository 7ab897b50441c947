//! Logging setup for the standalone-ds binary.

use crate::error::{Error, Result};

fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Installs a stderr `fmt` subscriber.
///
/// `verbose` 0 logs INFO, 1 DEBUG, 2 and above TRACE; `quiet` keeps only
/// errors. Stdout is left to the extraction result.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
