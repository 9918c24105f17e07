//! D-Bus proxy for the UPower display device.
//!
//! Only the properties the battery snapshot needs are declared.

use zbus::proxy;

/// Object path of UPower's composite battery
pub const DISPLAY_DEVICE_PATH: &str = "/org/freedesktop/UPower/devices/DisplayDevice";

/// UPower device state values
pub mod state {
    pub const UNKNOWN: u32 = 0;
    pub const CHARGING: u32 = 1;
    pub const DISCHARGING: u32 = 2;
    pub const EMPTY: u32 = 3;
    pub const FULLY_CHARGED: u32 = 4;
    pub const PENDING_CHARGE: u32 = 5;
    pub const PENDING_DISCHARGE: u32 = 6;
}

#[proxy(
    interface = "org.freedesktop.UPower.Device",
    default_service = "org.freedesktop.UPower",
    assume_defaults = false
)]
pub trait Device {
    /// Whether the device is present.
    #[zbus(property)]
    fn is_present(&self) -> zbus::Result<bool>;

    /// Percentage charge (0-100).
    #[zbus(property)]
    fn percentage(&self) -> zbus::Result<f64>;

    /// Charging state, one of the `state` constants.
    #[zbus(property)]
    fn state(&self) -> zbus::Result<u32>;

    /// Seconds until full, 0 when unknown.
    #[zbus(property)]
    fn time_to_full(&self) -> zbus::Result<i64>;

    /// Seconds until empty, 0 when unknown.
    #[zbus(property)]
    fn time_to_empty(&self) -> zbus::Result<i64>;
}
