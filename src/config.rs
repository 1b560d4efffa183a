//! Command-line configuration.
//!
//! Stored as TOML at the platform config dir
//! (`~/.config/afm-bridge/config.toml` on Linux), or wherever `--config`
//! points.
//!
//! # Example Configuration
//!
//! ```toml
//! pretty = true
//! log_filter = "afm_bridge=debug"
//! attributes = "/srv/project/attributes.json"
//! default_chart = "column"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::model::ChartKind;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Log directive used when `AFMB_LOG` is unset.
    pub log_filter: String,

    /// Attribute → display-form table used when `--attributes` is omitted.
    pub attributes: Option<PathBuf>,

    /// Chart type used by `to-vis-obj` when `--type` is omitted.
    pub default_chart: ChartKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty: false,
            log_filter: "warn".to_string(),
            attributes: None,
            default_chart: ChartKind::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Load a configuration file the user named explicitly.
    ///
    /// Unlike [`Config::load_from`], a missing file is an error.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load_from(path)
    }

    /// Default configuration file path.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        directories::ProjectDirs::from("com", "afm-bridge", "afm-bridge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.log_filter).map_err(|err| {
            ConfigError::Validation(format!("invalid log_filter '{}': {err}", self.log_filter))
        })?;

        if self
            .attributes
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "attributes path must not be empty".into(),
            ));
        }

        Ok(())
    }
}
