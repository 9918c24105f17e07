//! Host telemetry boundary
//!
//! A host exposes battery telemetry as a handle with four readable values and
//! callback registration for four named change events. [`TelemetryHost`]
//! is how a subscription obtains such a handle.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    #[error("Battery telemetry unavailable: {0}")]
    Unavailable(String),
}

impl TelemetryError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        TelemetryError::Unavailable(reason.into())
    }
}

/// Result of probing a host for battery telemetry support
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable(String),
}

/// Change notifications a telemetry handle can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryEvent {
    LevelChange,
    ChargingChange,
    ChargingTimeChange,
    DischargingTimeChange,
}

impl BatteryEvent {
    /// Every event a subscription listens to. Registration and removal both
    /// walk this list.
    pub fn all() -> &'static [BatteryEvent] {
        &[
            BatteryEvent::LevelChange,
            BatteryEvent::ChargingChange,
            BatteryEvent::ChargingTimeChange,
            BatteryEvent::DischargingTimeChange,
        ]
    }

    /// Host event name
    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryEvent::LevelChange => "levelchange",
            BatteryEvent::ChargingChange => "chargingchange",
            BatteryEvent::ChargingTimeChange => "chargingtimechange",
            BatteryEvent::DischargingTimeChange => "dischargingtimechange",
        }
    }
}

/// Callback invoked when a change event fires
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Host battery telemetry handle
pub trait BatteryTelemetry: Send + Sync {
    /// Charge level as a fraction in [0, 1]
    fn level(&self) -> f64;

    fn charging(&self) -> bool;

    /// Seconds until full, or `f64::INFINITY` when not applicable
    fn charging_time(&self) -> f64;

    /// Seconds until empty, or `f64::INFINITY` when not applicable
    fn discharging_time(&self) -> f64;

    fn add_listener(&self, event: BatteryEvent, listener: Listener) -> ListenerId;

    /// Returns false if no such listener was registered for `event`
    fn remove_listener(&self, event: BatteryEvent, id: ListenerId) -> bool;
}

/// Host environment that may provide battery telemetry
pub trait TelemetryHost {
    /// Check for telemetry support without acquiring anything
    fn probe(&self) -> Capability;

    /// Request the telemetry handle
    fn request(
        &self,
    ) -> impl Future<Output = Result<Arc<dyn BatteryTelemetry>, TelemetryError>> + Send;
}

/// Listener bookkeeping shared by telemetry implementations
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<HashMap<BatteryEvent, Vec<(ListenerId, Listener)>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, event: BatteryEvent, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event)
            .or_default()
            .push((id, listener));
        id
    }

    pub fn remove(&self, event: BatteryEvent, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(listeners) = entries.get_mut(&event) else {
            return false;
        };

        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            entries.remove(&event);
        }
        removed
    }

    /// Invoke every listener registered for `event`.
    ///
    /// Listeners run outside the registry lock so they may register or
    /// remove listeners themselves.
    pub fn dispatch(&self, event: BatteryEvent) {
        let listeners: Vec<Listener> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event)
            .map(|listeners| listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        tracing::trace!("Dispatching {} to {} listener(s)", event.as_str(), listeners.len());
        for listener in listeners {
            listener();
        }
    }

    /// Number of listeners registered for `event`
    pub fn count(&self, event: BatteryEvent) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event)
            .map_or(0, Vec::len)
    }

    /// Number of listeners across all events
    pub fn total(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }
}
