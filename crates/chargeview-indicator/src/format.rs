//! Snapshot to display-string formatting
//!
//! Everything here is pure: the same snapshot always yields the same
//! [`BatteryDisplay`].

use chargeview_hal::{BatterySnapshot, TimeEstimate};

/// Levels at or below this percentage count as low when not charging
pub const LOW_LEVEL_THRESHOLD: f64 = 20.0;

/// Fill color category for the battery gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    Charging,
    Normal,
    Low,
}

impl ColorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Charging => "charging",
            ColorClass::Normal => "normal",
            ColorClass::Low => "low",
        }
    }
}

/// Display fields derived from one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryDisplay {
    pub color: ColorClass,
    /// floor(level)
    pub level: u8,
    pub charging: bool,
    pub charging_label: String,
    pub discharging_label: String,
}

/// Derive every display field from `snapshot`
pub fn format(snapshot: &BatterySnapshot) -> BatteryDisplay {
    BatteryDisplay {
        color: color_class(snapshot.level, snapshot.charging),
        level: displayed_level(snapshot.level),
        charging: snapshot.charging,
        charging_label: charging_label(snapshot),
        discharging_label: discharging_label(snapshot),
    }
}

/// Charging wins over level; the low threshold itself is low
pub fn color_class(level: f64, charging: bool) -> ColorClass {
    if charging {
        ColorClass::Charging
    } else if level > LOW_LEVEL_THRESHOLD {
        ColorClass::Normal
    } else {
        ColorClass::Low
    }
}

pub fn displayed_level(level: f64) -> u8 {
    level.floor().clamp(0.0, 100.0) as u8
}

pub fn charging_label(snapshot: &BatterySnapshot) -> String {
    match snapshot.charging_time {
        TimeEstimate::NotApplicable if snapshot.charging => "Unknown".to_string(),
        TimeEstimate::NotApplicable => "Not Charging".to_string(),
        TimeEstimate::Seconds(secs) => format_duration(secs),
    }
}

pub fn discharging_label(snapshot: &BatterySnapshot) -> String {
    match snapshot.discharging_time {
        TimeEstimate::NotApplicable if snapshot.charging => "Charging".to_string(),
        TimeEstimate::NotApplicable => "Unknown".to_string(),
        TimeEstimate::Seconds(secs) => format_duration(secs),
    }
}

/// "1 hours, 1 minutes, 1 seconds" style duration with zero parts left out.
/// Zero seconds formats as an empty string.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    [(hours, "hours"), (minutes, "minutes"), (seconds, "seconds")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{} {}", value, unit))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(level: f64, charging: bool) -> BatterySnapshot {
        BatterySnapshot {
            level,
            charging,
            charging_time: TimeEstimate::NotApplicable,
            discharging_time: TimeEstimate::NotApplicable,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3661), "1 hours, 1 minutes, 1 seconds");
        assert_eq!(format_duration(0), "");
        assert_eq!(format_duration(59), "59 seconds");
        assert_eq!(format_duration(3600), "1 hours");
        assert_eq!(format_duration(60), "1 minutes");
        assert_eq!(format_duration(7205), "2 hours, 5 seconds");
        assert_eq!(format_duration(90_000), "25 hours");
    }

    #[test]
    fn test_charging_color_ignores_level() {
        for level in [0.0, 5.0, 20.0, 20.5, 50.0, 100.0] {
            assert_eq!(color_class(level, true), ColorClass::Charging);
        }
    }

    #[test]
    fn test_low_threshold_is_exclusive() {
        assert_eq!(color_class(20.0, false), ColorClass::Low);
        assert_eq!(color_class(0.0, false), ColorClass::Low);
        assert_eq!(color_class(20.01, false), ColorClass::Normal);
        assert_eq!(color_class(21.0, false), ColorClass::Normal);
        assert_eq!(color_class(100.0, false), ColorClass::Normal);
    }

    #[test]
    fn test_displayed_level_floors() {
        for tenths in 0..=1000 {
            let level = tenths as f64 / 10.0;
            assert_eq!(displayed_level(level) as f64, level.floor(), "level {}", level);
        }
        assert_eq!(displayed_level(99.99), 99);
        assert_eq!(displayed_level(100.0), 100);
    }

    #[test]
    fn test_charging_time_sentinel() {
        assert_eq!(charging_label(&snapshot(50.0, false)), "Not Charging");
        assert_eq!(charging_label(&snapshot(50.0, true)), "Unknown");
    }

    #[test]
    fn test_discharging_time_sentinel() {
        assert_eq!(discharging_label(&snapshot(50.0, true)), "Charging");
        assert_eq!(discharging_label(&snapshot(50.0, false)), "Unknown");
    }

    #[test]
    fn test_finite_times_ignore_charging_flag() {
        let snap = BatterySnapshot {
            level: 64.0,
            charging: true,
            charging_time: TimeEstimate::Seconds(59),
            discharging_time: TimeEstimate::Seconds(0),
        };
        assert_eq!(charging_label(&snap), "59 seconds");
        assert_eq!(discharging_label(&snap), "");
    }

    #[test]
    fn test_format_full_display() {
        let display = format(&BatterySnapshot {
            level: 19.7,
            charging: false,
            charging_time: TimeEstimate::NotApplicable,
            discharging_time: TimeEstimate::Seconds(3661),
        });

        assert_eq!(
            display,
            BatteryDisplay {
                color: ColorClass::Low,
                level: 19,
                charging: false,
                charging_label: "Not Charging".to_string(),
                discharging_label: "1 hours, 1 minutes, 1 seconds".to_string(),
            }
        );
    }

    #[test]
    fn test_color_class_names() {
        assert_eq!(ColorClass::Charging.as_str(), "charging");
        assert_eq!(ColorClass::Normal.as_str(), "normal");
        assert_eq!(ColorClass::Low.as_str(), "low");
    }
}
