//! Configuration management for chargeview
//!
//! Handles backend selection, theme, logging and mock telemetry values.
//! Configuration lives in a TOML file with one table per section.

mod indicator_config;
mod logging_config;
mod mock_config;

pub use indicator_config::{Backend, IndicatorConfig, Theme};
pub use logging_config::LoggingConfig;
pub use mock_config::MockConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// System configuration directory
pub const CONFIG_DIR: &str = "/etc/chargeview";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "CHARGEVIEW_CONFIG";

/// Main chargeview configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChargeviewConfig {
    #[serde(default)]
    pub indicator: IndicatorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub mock: MockConfig,
}

impl ChargeviewConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// `CHARGEVIEW_CONFIG` wins when set and must point at an existing file.
    /// Otherwise the user config is tried, then the system config, then
    /// built-in defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        Self::load_first(&default_locations())
    }

    /// Load the first existing file in `candidates`, or defaults if none exist
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::load(path)
            }
            None => {
                tracing::warn!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indicator.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "indicator.tick_rate_ms must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.mock.level) {
            return Err(ConfigError::Invalid(format!(
                "mock.level must be between 0.0 and 1.0, got {}",
                self.mock.level
            )));
        }

        Ok(())
    }
}

/// User then system configuration paths
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    let user_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));
    if let Some(dir) = user_dir {
        locations.push(dir.join("chargeview").join("config.toml"));
    }

    locations.push(Path::new(CONFIG_DIR).join("config.toml"));
    locations
}
