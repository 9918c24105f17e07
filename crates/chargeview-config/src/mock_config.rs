//! Initial values for the mock telemetry backend

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// When false, simulate a host with no battery telemetry
    #[serde(default = "default_true")]
    pub available: bool,

    /// Reject the telemetry request with this reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject: Option<String>,

    /// Charge level as a fraction (0.0-1.0)
    #[serde(default = "default_level")]
    pub level: f64,

    #[serde(default)]
    pub charging: bool,

    /// Seconds until full; absent means no estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charging_time: Option<u64>,

    /// Seconds until empty; absent means no estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharging_time: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_level() -> f64 {
    0.85
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            available: true,
            reject: None,
            level: default_level(),
            charging: false,
            charging_time: None,
            discharging_time: None,
        }
    }
}

impl MockConfig {
    /// Host-style seconds value, where a missing estimate is infinite
    pub fn charging_time_secs(&self) -> f64 {
        self.charging_time.map_or(f64::INFINITY, |s| s as f64)
    }

    pub fn discharging_time_secs(&self) -> f64 {
        self.discharging_time.map_or(f64::INFINITY, |s| s as f64)
    }
}
