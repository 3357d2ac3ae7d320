use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AllocatorError, Result};

/// Selects which `tracing_subscriber::fmt` event formatter a sink uses.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// File-sink rotation policy.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Console sink settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSinkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub with_ansi: bool,
    #[serde(default)]
    pub with_target: bool,
    #[serde(default)]
    pub with_thread_ids: bool,
    #[serde(default)]
    pub with_line_numbers: bool,
}

impl Default for ConsoleSinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: LogFormat::Pretty,
            with_ansi: true,
            with_target: false,
            with_thread_ids: false,
            with_line_numbers: false,
        }
    }
}

/// File sink settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileSinkConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub rotation: RotationPolicy,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: default_filename(),
            format: LogFormat::Json,
            rotation: RotationPolicy::Daily,
        }
    }
}

/// Fields stamped onto every event, independent of the chosen format.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomFields {
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

impl Default for CustomFields {
    fn default() -> Self {
        Self {
            instance_id: std::env::var("BSA_INSTANCE_ID").ok(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            environment: std::env::var("BSA_ENV").or_else(|_| std::env::var("RUST_ENV")).ok(),
            hostname: hostname::get().ok().and_then(|h| h.into_string().ok()),
        }
    }
}

/// Span-field verbosity, used by the JSON formatter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpanConfig {
    #[serde(default = "default_true")]
    pub include_name: bool,
    #[serde(default)]
    pub include_full_list: bool,
}

impl Default for SpanConfig {
    fn default() -> Self {
        Self {
            include_name: true,
            include_full_list: false,
        }
    }
}

/// Top-level logging configuration, loaded the same way as
/// [`crate::config::BalancerSettings`] (defaults → file → env).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default)]
    pub console: ConsoleSinkConfig,
    #[serde(default)]
    pub file: FileSinkConfig,
    #[serde(default)]
    pub span: SpanConfig,
    #[serde(default)]
    pub custom_fields: CustomFields,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: default_log_dir(),
            console: ConsoleSinkConfig::default(),
            file: FileSinkConfig::default(),
            span: SpanConfig::default(),
            custom_fields: CustomFields::default(),
        }
    }
}

impl LoggingConfig {
    pub fn console_format(&self) -> LogFormat {
        self.console.format
    }

    pub fn file_format(&self) -> LogFormat {
        self.file.format
    }

    pub fn file_rotation(&self) -> RotationPolicy {
        self.file.rotation
    }

    /// `RUST_LOG`/`BSA_LOG_LEVEL` take priority over the loaded level.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("BSA_LOG_LEVEL") {
            self.level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            return Err(AllocatorError::InvalidArgument(
                "log level must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn ensure_log_dir(&self) -> Result<()> {
        if self.file.enabled {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                AllocatorError::InvalidArgument(format!(
                    "cannot create log dir {}: {e}",
                    self.log_dir.display()
                ))
            })?;
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".into()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_filename() -> String {
    "bsa.log".into()
}
