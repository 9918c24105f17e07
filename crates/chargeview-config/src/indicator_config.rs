//! Indicator display settings

use serde::{Deserialize, Serialize};

/// Where battery telemetry comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// UPower display device over the system D-Bus
    #[default]
    Upower,
    /// In-memory mock driven from the keyboard
    Mock,
}

/// Color scheme for the battery outline and text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Dark background with light text
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub theme: Theme,

    /// Redraw and input poll interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            theme: Theme::default(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle().toggle(), Theme::Light);
        assert!(Theme::default().is_dark());
    }

    #[test]
    fn test_backend_names() {
        let config: IndicatorConfig = toml::from_str("backend = \"mock\"\ntheme = \"light\"").unwrap();
        assert_eq!(config.backend, Backend::Mock);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.tick_rate_ms, 250);
    }
}
