use tracing_subscriber::EnvFilter;

use crate::logging::LoggingConfig;

/// `RUST_LOG` wins if set; otherwise falls back to the configured level.
pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}
