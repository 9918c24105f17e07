//! What the indicator currently shows

use crate::format::{BatteryDisplay, format};
use chargeview_hal::{BatterySnapshot, Subscription};

/// Indicator state: waiting, failed, or showing the latest snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Failed(String),
    Ready {
        snapshot: BatterySnapshot,
        display: BatteryDisplay,
    },
}

impl ViewState {
    /// Derive the state from a subscription's error and latest snapshot
    pub fn from_subscription(subscription: &Subscription) -> Self {
        if let Some(error) = subscription.error() {
            return ViewState::Failed(error.to_string());
        }

        match subscription.snapshot() {
            Some(snapshot) => ViewState::ready(snapshot),
            None => ViewState::Loading,
        }
    }

    pub fn ready(snapshot: BatterySnapshot) -> Self {
        ViewState::Ready {
            display: format(&snapshot),
            snapshot,
        }
    }

    /// Recompute from a fresh snapshot. A failed state stays failed.
    pub fn update(&mut self, snapshot: BatterySnapshot) {
        if !matches!(self, ViewState::Failed(_)) {
            *self = ViewState::ready(snapshot);
        }
    }

    pub fn display(&self) -> Option<&BatteryDisplay> {
        match self {
            ViewState::Ready { display, .. } => Some(display),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ColorClass;
    use chargeview_hal::TimeEstimate;
    use chargeview_hal::mock::{MockHost, MockReadings};
    use chargeview_hal::subscribe;

    fn snapshot(level: f64) -> BatterySnapshot {
        BatterySnapshot {
            level,
            charging: false,
            charging_time: TimeEstimate::NotApplicable,
            discharging_time: TimeEstimate::Seconds(59),
        }
    }

    #[test]
    fn test_update_recomputes_display() {
        let mut state = ViewState::Loading;
        state.update(snapshot(80.0));
        assert_eq!(state.display().unwrap().color, ColorClass::Normal);

        state.update(snapshot(12.0));
        let display = state.display().unwrap();
        assert_eq!(display.color, ColorClass::Low);
        assert_eq!(display.level, 12);
        assert_eq!(display.discharging_label, "59 seconds");
    }

    #[test]
    fn test_failed_state_is_terminal() {
        let mut state = ViewState::Failed("Battery telemetry unavailable: nope".into());
        state.update(snapshot(50.0));
        assert!(matches!(state, ViewState::Failed(_)));
        assert!(state.display().is_none());
    }

    #[tokio::test]
    async fn test_from_subscription() {
        let ok = subscribe(&MockHost::new(MockReadings::default())).await;
        assert!(matches!(ViewState::from_subscription(&ok), ViewState::Ready { .. }));

        let failed = subscribe(&MockHost::unsupported()).await;
        match ViewState::from_subscription(&failed) {
            ViewState::Failed(message) => assert!(message.contains("not supported")),
            other => panic!("Expected failed state, got {:?}", other),
        }
    }
}
