use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::runtime::OutputFormat;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Interval between background listings, per table
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// How long status-line notifications stay visible
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_seconds: i64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            notification_ttl_seconds: default_notification_ttl(),
        }
    }
}

/// Container runtime tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Program to invoke (`docker`, `podman`, or a path)
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Upper bound on any single invocation
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            output_format: OutputFormat::default(),
            command_timeout_seconds: default_command_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LogConfig {
    /// Log file location, defaulting to the system temp directory
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("dockpane.log"))
    }
}

// Default value functions
fn default_poll_interval() -> u64 {
    2000
}

fn default_notification_ttl() -> i64 {
    10
}

fn default_program() -> String {
    "docker".to_string()
}

fn default_command_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
