//! Log output settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file path; defaults to `chargeview.log` in the temp directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    /// Resolved log file path
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("chargeview.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_in_temp_dir() {
        let config = LoggingConfig::default();
        assert!(config.file_path().starts_with(std::env::temp_dir()));
        assert!(config.file_path().ends_with("chargeview.log"));
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_explicit_file() {
        let config: LoggingConfig = toml::from_str("file = \"/var/log/chargeview.log\"").unwrap();
        assert_eq!(config.file_path(), PathBuf::from("/var/log/chargeview.log"));
        assert_eq!(config.level, "info");
    }
}
