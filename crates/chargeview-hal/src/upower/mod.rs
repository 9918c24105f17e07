//! UPower telemetry host
//!
//! Reads the UPower display device over the system D-Bus and turns its
//! property-change signals into the four battery change events:
//!
//! | UPower property | event                   |
//! |-----------------|-------------------------|
//! | `Percentage`    | `levelchange`           |
//! | `State`         | `chargingchange`        |
//! | `TimeToFull`    | `chargingtimechange`    |
//! | `TimeToEmpty`   | `dischargingtimechange` |

pub mod dbus;

use crate::telemetry::{
    BatteryEvent, BatteryTelemetry, Capability, Listener, ListenerId, ListenerRegistry,
    TelemetryError, TelemetryHost,
};
use dbus::DeviceProxy;
use futures_util::StreamExt;
use futures_util::stream::select_all;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use zbus::Connection;

/// Default location of the system bus socket
pub const SYSTEM_BUS_SOCKET: &str = "/run/dbus/system_bus_socket";

impl From<zbus::Error> for TelemetryError {
    fn from(e: zbus::Error) -> Self {
        TelemetryError::Unavailable(format!("UPower: {}", e))
    }
}

/// Raw UPower property values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UPowerReadings {
    pub percentage: f64,
    pub state: u32,
    pub time_to_full: i64,
    pub time_to_empty: i64,
}

impl Default for UPowerReadings {
    fn default() -> Self {
        Self {
            percentage: 0.0,
            state: dbus::state::UNKNOWN,
            time_to_full: 0,
            time_to_empty: 0,
        }
    }
}

impl UPowerReadings {
    /// Level as a fraction in [0, 1]
    pub fn level(&self) -> f64 {
        (self.percentage / 100.0).clamp(0.0, 1.0)
    }

    pub fn charging(&self) -> bool {
        matches!(
            self.state,
            dbus::state::CHARGING | dbus::state::PENDING_CHARGE
        )
    }

    /// UPower reports 0 when it has no estimate
    pub fn charging_time(&self) -> f64 {
        seconds_or_infinite(self.time_to_full)
    }

    pub fn discharging_time(&self) -> f64 {
        seconds_or_infinite(self.time_to_empty)
    }
}

fn seconds_or_infinite(seconds: i64) -> f64 {
    if seconds > 0 {
        seconds as f64
    } else {
        f64::INFINITY
    }
}

struct Shared {
    readings: RwLock<UPowerReadings>,
    listeners: ListenerRegistry,
}

impl Shared {
    fn readings(&self) -> UPowerReadings {
        *self.readings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, event: BatteryEvent, update: impl FnOnce(&mut UPowerReadings)) {
        {
            let mut readings = self.readings.write().unwrap_or_else(PoisonError::into_inner);
            update(&mut readings);
        }
        self.listeners.dispatch(event);
    }
}

/// Battery telemetry backed by the UPower display device
pub struct UPowerBattery {
    shared: Arc<Shared>,
    monitor: JoinHandle<()>,
}

impl UPowerBattery {
    /// Read the display device and start following its property changes.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn connect(conn: &Connection) -> Result<Self, TelemetryError> {
        let device = DeviceProxy::builder(conn)
            .path(dbus::DISPLAY_DEVICE_PATH)?
            .build()
            .await?;

        if !device.is_present().await.unwrap_or(false) {
            return Err(TelemetryError::unavailable("no battery present"));
        }

        let readings = UPowerReadings {
            percentage: device.percentage().await?,
            state: device.state().await?,
            time_to_full: device.time_to_full().await?,
            time_to_empty: device.time_to_empty().await?,
        };
        debug!("UPower display device: {:?}", readings);

        let shared = Arc::new(Shared {
            readings: RwLock::new(readings),
            listeners: ListenerRegistry::new(),
        });

        let percentage = device
            .receive_percentage_changed()
            .await
            .then({
                let shared = Arc::clone(&shared);
                move |change| {
                    let shared = Arc::clone(&shared);
                    async move {
                        if let Ok(value) = change.get().await {
                            debug!("Battery percentage changed: {}%", value);
                            shared.apply(BatteryEvent::LevelChange, |r| r.percentage = value);
                        }
                    }
                }
            })
            .boxed();

        let state = device
            .receive_state_changed()
            .await
            .then({
                let shared = Arc::clone(&shared);
                move |change| {
                    let shared = Arc::clone(&shared);
                    async move {
                        if let Ok(value) = change.get().await {
                            debug!("Battery state changed: {}", value);
                            shared.apply(BatteryEvent::ChargingChange, |r| r.state = value);
                        }
                    }
                }
            })
            .boxed();

        let time_to_full = device
            .receive_time_to_full_changed()
            .await
            .then({
                let shared = Arc::clone(&shared);
                move |change| {
                    let shared = Arc::clone(&shared);
                    async move {
                        if let Ok(value) = change.get().await {
                            debug!("Time to full changed: {}s", value);
                            shared.apply(BatteryEvent::ChargingTimeChange, |r| {
                                r.time_to_full = value
                            });
                        }
                    }
                }
            })
            .boxed();

        let time_to_empty = device
            .receive_time_to_empty_changed()
            .await
            .then({
                let shared = Arc::clone(&shared);
                move |change| {
                    let shared = Arc::clone(&shared);
                    async move {
                        if let Ok(value) = change.get().await {
                            debug!("Time to empty changed: {}s", value);
                            shared.apply(BatteryEvent::DischargingTimeChange, |r| {
                                r.time_to_empty = value
                            });
                        }
                    }
                }
            })
            .boxed();

        let mut changes = select_all([percentage, state, time_to_full, time_to_empty]);
        let monitor = tokio::spawn(async move {
            info!("Listening for UPower battery changes");
            while changes.next().await.is_some() {}
            warn!("UPower property streams ended");
        });

        Ok(Self { shared, monitor })
    }
}

impl Drop for UPowerBattery {
    fn drop(&mut self) {
        self.monitor.abort();
    }
}

impl BatteryTelemetry for UPowerBattery {
    fn level(&self) -> f64 {
        self.shared.readings().level()
    }

    fn charging(&self) -> bool {
        self.shared.readings().charging()
    }

    fn charging_time(&self) -> f64 {
        self.shared.readings().charging_time()
    }

    fn discharging_time(&self) -> f64 {
        self.shared.readings().discharging_time()
    }

    fn add_listener(&self, event: BatteryEvent, listener: Listener) -> ListenerId {
        self.shared.listeners.add(event, listener)
    }

    fn remove_listener(&self, event: BatteryEvent, id: ListenerId) -> bool {
        self.shared.listeners.remove(event, id)
    }
}

/// Host backed by UPower on the system bus
#[derive(Debug, Clone)]
pub struct UPowerHost {
    bus_address: Option<String>,
    socket_path: PathBuf,
}

impl UPowerHost {
    /// Host using the standard system bus location, honouring
    /// `DBUS_SYSTEM_BUS_ADDRESS`
    pub fn new() -> Self {
        Self {
            bus_address: std::env::var("DBUS_SYSTEM_BUS_ADDRESS").ok(),
            socket_path: PathBuf::from(SYSTEM_BUS_SOCKET),
        }
    }

    /// Host that only looks for the bus socket at `path`
    pub fn with_socket_path(path: impl Into<PathBuf>) -> Self {
        Self {
            bus_address: None,
            socket_path: path.into(),
        }
    }
}

impl Default for UPowerHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryHost for UPowerHost {
    fn probe(&self) -> Capability {
        if self.bus_address.is_some() || self.socket_path.exists() {
            Capability::Available
        } else {
            Capability::Unavailable(format!(
                "no system D-Bus at {}",
                self.socket_path.display()
            ))
        }
    }

    async fn request(&self) -> Result<Arc<dyn BatteryTelemetry>, TelemetryError> {
        let conn = Connection::system().await?;
        let battery = UPowerBattery::connect(&conn).await?;
        info!("Connected to UPower display device");
        Ok(Arc::new(battery))
    }
}
