//! Tracing setup for the tilegrid CLI
//!
//! Usage:
//!   tilegrid --debug ...               # Debug logging to stderr
//!   RUST_LOG=tilegrid_core=trace ...   # Per-notification preview updates
//!
//! Environment variables:
//!   RUST_LOG                           # Log filter (default: config logging.level, then info)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets debug level if RUST_LOG is not set)
    pub debug: bool,
    /// Fallback filter from the config file
    pub level: Option<String>,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if self.debug {
                EnvFilter::new("debug")
            } else {
                EnvFilter::new(self.level.as_deref().unwrap_or("info"))
            }
        })
    }
}

/// Initialize console tracing. Output goes to stderr so stdout stays
/// parseable for `--json`.
pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
