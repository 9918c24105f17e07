//! Mock telemetry host for testing without a real battery
//!
//! [`MockBattery`] keeps its readings in memory and fires the matching change
//! event from each setter, the way a host would after a hardware update.
//!
//! # Usage
//!
//! ```
//! use chargeview_hal::mock::{MockHost, MockReadings};
//!
//! let host = MockHost::new(MockReadings::default());
//! let battery = host.battery();
//! battery.set_level(0.15);
//!
//! // Hosts without telemetry support
//! let unsupported = MockHost::unsupported();
//! ```

use crate::telemetry::{
    BatteryEvent, BatteryTelemetry, Capability, Listener, ListenerId, ListenerRegistry,
    TelemetryError, TelemetryHost,
};
use std::sync::{Arc, PoisonError, RwLock};

/// Raw host-side readings, in host units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockReadings {
    /// Fraction in [0, 1]
    pub level: f64,
    pub charging: bool,
    /// Seconds, or `f64::INFINITY`
    pub charging_time: f64,
    /// Seconds, or `f64::INFINITY`
    pub discharging_time: f64,
}

impl Default for MockReadings {
    fn default() -> Self {
        Self {
            level: 0.85,
            charging: false,
            charging_time: f64::INFINITY,
            discharging_time: 9000.0,
        }
    }
}

/// In-memory battery telemetry handle
pub struct MockBattery {
    readings: RwLock<MockReadings>,
    listeners: ListenerRegistry,
}

impl MockBattery {
    pub fn new(readings: MockReadings) -> Self {
        Self {
            readings: RwLock::new(readings),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Current readings
    pub fn readings(&self) -> MockReadings {
        *self.readings.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate a level change (fraction in [0, 1])
    pub fn set_level(&self, level: f64) {
        self.update(BatteryEvent::LevelChange, |r| r.level = level.clamp(0.0, 1.0));
    }

    /// Simulate plugging or unplugging the charger
    pub fn set_charging(&self, charging: bool) {
        self.update(BatteryEvent::ChargingChange, |r| r.charging = charging);
    }

    pub fn set_charging_time(&self, seconds: f64) {
        self.update(BatteryEvent::ChargingTimeChange, |r| r.charging_time = seconds);
    }

    pub fn set_discharging_time(&self, seconds: f64) {
        self.update(BatteryEvent::DischargingTimeChange, |r| {
            r.discharging_time = seconds
        });
    }

    /// Listeners currently registered for `event`
    pub fn listener_count(&self, event: BatteryEvent) -> usize {
        self.listeners.count(event)
    }

    /// Listeners currently registered across all events
    pub fn total_listeners(&self) -> usize {
        self.listeners.total()
    }

    fn update(&self, event: BatteryEvent, apply: impl FnOnce(&mut MockReadings)) {
        {
            let mut readings = self.readings.write().unwrap_or_else(PoisonError::into_inner);
            apply(&mut readings);
        }
        tracing::debug!("[MOCK] {} fired", event.as_str());
        self.listeners.dispatch(event);
    }
}

impl Default for MockBattery {
    fn default() -> Self {
        Self::new(MockReadings::default())
    }
}

impl BatteryTelemetry for MockBattery {
    fn level(&self) -> f64 {
        self.readings().level
    }

    fn charging(&self) -> bool {
        self.readings().charging
    }

    fn charging_time(&self) -> f64 {
        self.readings().charging_time
    }

    fn discharging_time(&self) -> f64 {
        self.readings().discharging_time
    }

    fn add_listener(&self, event: BatteryEvent, listener: Listener) -> ListenerId {
        self.listeners.add(event, listener)
    }

    fn remove_listener(&self, event: BatteryEvent, id: ListenerId) -> bool {
        self.listeners.remove(event, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MockMode {
    Available,
    Unsupported,
    Rejecting(String),
}

/// Mock host handing out a shared [`MockBattery`]
pub struct MockHost {
    mode: MockMode,
    battery: Arc<MockBattery>,
}

impl MockHost {
    /// Host whose telemetry request succeeds
    pub fn new(readings: MockReadings) -> Self {
        Self {
            mode: MockMode::Available,
            battery: Arc::new(MockBattery::new(readings)),
        }
    }

    /// Host without telemetry support; the probe fails
    pub fn unsupported() -> Self {
        Self {
            mode: MockMode::Unsupported,
            battery: Arc::new(MockBattery::default()),
        }
    }

    /// Host that advertises support but rejects the handle request
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            mode: MockMode::Rejecting(reason.into()),
            battery: Arc::new(MockBattery::default()),
        }
    }

    /// Shared battery handle, for driving changes in tests
    pub fn battery(&self) -> Arc<MockBattery> {
        Arc::clone(&self.battery)
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new(MockReadings::default())
    }
}

impl TelemetryHost for MockHost {
    fn probe(&self) -> Capability {
        match self.mode {
            MockMode::Unsupported => {
                Capability::Unavailable("not supported on this host".to_string())
            }
            _ => Capability::Available,
        }
    }

    async fn request(&self) -> Result<Arc<dyn BatteryTelemetry>, TelemetryError> {
        match &self.mode {
            MockMode::Available => {
                let battery: Arc<dyn BatteryTelemetry> = self.battery.clone();
                Ok(battery)
            }
            MockMode::Unsupported => Err(TelemetryError::unavailable(
                "not supported on this host",
            )),
            MockMode::Rejecting(reason) => Err(TelemetryError::unavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_mock_readings_default() {
        let readings = MockReadings::default();
        assert_eq!(readings.level, 0.85);
        assert!(!readings.charging);
        assert!(readings.charging_time.is_infinite());
    }

    #[test]
    fn test_setters_fire_matching_event() {
        let battery = MockBattery::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        battery.add_listener(
            BatteryEvent::ChargingChange,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        battery.set_level(0.5);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        battery.set_charging(true);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(battery.charging());
        assert_eq!(battery.level(), 0.5);
    }

    #[test]
    fn test_listener_sees_new_value() {
        let battery = Arc::new(MockBattery::default());
        let seen = Arc::new(RwLock::new(None));

        let weak = Arc::downgrade(&battery);
        let slot = Arc::clone(&seen);
        battery.add_listener(
            BatteryEvent::LevelChange,
            Arc::new(move || {
                if let Some(battery) = weak.upgrade() {
                    *slot.write().unwrap() = Some(battery.level());
                }
            }),
        );

        battery.set_level(0.3);
        assert_eq!(*seen.read().unwrap(), Some(0.3));
    }

    #[test]
    fn test_level_is_clamped() {
        let battery = MockBattery::default();
        battery.set_level(1.7);
        assert_eq!(battery.level(), 1.0);
        battery.set_level(-0.2);
        assert_eq!(battery.level(), 0.0);
    }

    #[test]
    fn test_host_modes() {
        assert_eq!(MockHost::default().probe(), Capability::Available);
        assert!(matches!(
            MockHost::unsupported().probe(),
            Capability::Unavailable(_)
        ));
        assert_eq!(MockHost::rejecting("denied").probe(), Capability::Available);
    }

    #[tokio::test]
    async fn test_rejecting_host_request_fails() {
        let host = MockHost::rejecting("permission denied");
        let err = host.request().await.err().unwrap();
        assert_eq!(err, TelemetryError::unavailable("permission denied"));
    }

    #[tokio::test]
    async fn test_request_shares_battery() {
        let host = MockHost::default();
        let telemetry = host.request().await.unwrap();
        host.battery().set_level(0.25);
        assert_eq!(telemetry.level(), 0.25);
    }
}
