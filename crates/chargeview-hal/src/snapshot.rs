//! Battery snapshots
//!
//! A snapshot is a full copy of the telemetry values at one instant. Every
//! change notification produces a new one; nothing is ever patched in place.

use crate::telemetry::BatteryTelemetry;

/// Remaining-time estimate reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEstimate {
    /// Whole seconds remaining
    Seconds(u64),
    /// The host reports no estimate (infinite sentinel)
    NotApplicable,
}

impl TimeEstimate {
    /// Convert a host value in seconds, where any non-finite value is the
    /// "not applicable" sentinel. Fractional seconds are truncated and
    /// negative values clamp to zero.
    pub fn from_host_seconds(seconds: f64) -> Self {
        if seconds.is_finite() {
            TimeEstimate::Seconds(seconds.max(0.0).floor() as u64)
        } else {
            TimeEstimate::NotApplicable
        }
    }
}

/// Battery state at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySnapshot {
    /// Charge level as a percentage in [0, 100]
    pub level: f64,
    pub charging: bool,
    pub charging_time: TimeEstimate,
    pub discharging_time: TimeEstimate,
}

impl BatterySnapshot {
    /// Mirror the current values of a telemetry handle.
    ///
    /// The host reports the level as a fraction in [0, 1]; the snapshot
    /// stores it as a percentage.
    pub fn capture(telemetry: &dyn BatteryTelemetry) -> Self {
        Self {
            level: fraction_to_percent(telemetry.level()),
            charging: telemetry.charging(),
            charging_time: TimeEstimate::from_host_seconds(telemetry.charging_time()),
            discharging_time: TimeEstimate::from_host_seconds(telemetry.discharging_time()),
        }
    }
}

/// Scale a [0, 1] fraction to a percentage, dropping binary rounding noise
/// (0.29 * 100.0 is 28.999999999999996) so whole percentages stay whole.
fn fraction_to_percent(fraction: f64) -> f64 {
    (fraction * 100.0 * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBattery, MockReadings};

    #[test]
    fn test_infinite_is_not_applicable() {
        assert_eq!(
            TimeEstimate::from_host_seconds(f64::INFINITY),
            TimeEstimate::NotApplicable
        );
        assert_eq!(
            TimeEstimate::from_host_seconds(f64::NAN),
            TimeEstimate::NotApplicable
        );
    }

    #[test]
    fn test_finite_seconds() {
        assert_eq!(TimeEstimate::from_host_seconds(3661.0), TimeEstimate::Seconds(3661));
        assert_eq!(TimeEstimate::from_host_seconds(59.9), TimeEstimate::Seconds(59));
        assert_eq!(TimeEstimate::from_host_seconds(-4.0), TimeEstimate::Seconds(0));
    }

    #[test]
    fn test_whole_percentages_stay_whole() {
        for percent in 0..=100 {
            let level = fraction_to_percent(percent as f64 / 100.0);
            assert_eq!(level, percent as f64);
        }
        assert_eq!(fraction_to_percent(0.29), 29.0);
        assert_eq!(fraction_to_percent(0.5), 50.0);
        assert!((fraction_to_percent(0.123456789) - 12.345679).abs() < 1e-9);
    }

    #[test]
    fn test_capture_scales_level() {
        let battery = MockBattery::new(MockReadings {
            level: 0.42,
            charging: true,
            charging_time: 1800.0,
            discharging_time: f64::INFINITY,
        });

        let snapshot = BatterySnapshot::capture(&battery);
        assert!((snapshot.level - 42.0).abs() < 1e-9);
        assert!(snapshot.charging);
        assert_eq!(snapshot.charging_time, TimeEstimate::Seconds(1800));
        assert_eq!(snapshot.discharging_time, TimeEstimate::NotApplicable);
    }
}
