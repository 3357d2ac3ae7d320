//! Structured logging, wired the same way as the rest of this codebase:
//! a [`LoggingConfig`] loaded from defaults/file/env, layered onto
//! `tracing_subscriber` as a console sink plus an optional rotating file
//! sink. Allocator phases emit `tracing::debug!`/`trace!` spans for pass
//! start, phase-skip reasons, and per-shard decisions under explain
//! mode, and `tracing::warn!` before a Model invariant violation becomes a
//! debug-assertion panic.

pub mod config;
mod filters;
mod formats;
mod formatter;
pub mod sinks;

pub use config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::error::Result;

/// Handle controlling the logging subsystem's lifecycle. Dropping it flushes
/// the non-blocking file writer, if one is active.
pub struct LoggingHandle {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl LoggingHandle {
    /// Graceful shutdown with an explicit flush.
    pub fn shutdown(self) {
        drop(self);
    }
}

/// Initialize logging from a loaded configuration. Call once, at process
/// start (or test-harness start, guarded by `std::sync::Once` if called
/// from multiple tests in one binary).
pub fn init_logging(mut config: LoggingConfig) -> Result<LoggingHandle> {
    config.apply_env_overrides();
    config.validate()?;
    config.ensure_log_dir()?;

    let env_filter = filters::build_filter_from_config(&config);

    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();

    if config.console.enabled {
        let console_layer = sinks::console::layer_with_config(&config)
            .map_err(|e| crate::error::AllocatorError::InvalidArgument(e.to_string()))?;
        layers.push(console_layer);
    }

    let file_guard = if config.file.enabled {
        let (file_layer, guard) = sinks::file::layer_with_config(&config)
            .map_err(|e| crate::error::AllocatorError::InvalidArgument(e.to_string()))?;
        layers.push(file_layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        "balanced-shards-allocator logging initialized"
    );

    Ok(LoggingHandle {
        _file_guard: file_guard,
    })
}
