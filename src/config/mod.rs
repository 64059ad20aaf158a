use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::{debug, info};

use crate::core::ConfigError;

pub mod model;

pub use model::*;

impl Config {
    /// Per-user config file, e.g. `~/.config/dockpane/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dockpane", "dockpane")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from a specific file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::Parse(format!("{}: {}", path.display(), e)),
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        debug!("Configuration loaded and validated successfully");

        Ok(config)
    }

    /// Load the per-user file, then `./config.toml`, then defaults
    pub fn load_default() -> Result<Self> {
        let candidates = Self::default_path()
            .into_iter()
            .chain(std::iter::once(PathBuf::from("config.toml")));

        for path in candidates {
            if path.exists() {
                return Self::load(&path);
            }
        }

        info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Write the configuration as TOML, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Saving configuration to: {}", path.display());

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Write a default config file at `path`; an existing file is kept unless `force`
    pub fn init<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        Config::default().save(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Validation(msg.to_string()));

        if self.general.poll_interval_ms < 100 {
            return invalid("poll_interval_ms must be at least 100");
        }

        if self.general.notification_ttl_seconds < 1 {
            return invalid("notification_ttl_seconds must be at least 1");
        }

        if self.runtime.program.trim().is_empty() {
            return invalid("runtime.program must not be empty");
        }

        if self.runtime.command_timeout_seconds < 1 {
            return invalid("command_timeout_seconds must be at least 1");
        }

        Ok(())
    }
}
