//! Diagnostics setup. Logs go to standard error; standard output carries
//! only the JSON document.
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Overrides the log filter, e.g. `SWIFTOCR_LOG=swiftocr=trace`.
pub const LOG_ENV: &str = "SWIFTOCR_LOG";

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,swiftocr=debug,swiftocr_vision=debug";

pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    })
}

pub fn init(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
