//! Tracing setup

use tracing_subscriber::EnvFilter;

use crate::config::QueryConfig;

/// Initialize JSON tracing output at the configured log level
///
/// Falls back to `info` when the level cannot be parsed. Calling this more
/// than once keeps the first subscriber.
pub fn init_tracing(config: &QueryConfig) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(log_level = %config.log_level, "Tracing initialized");
    }
}
