//! Battery telemetry layer
//!
//! This crate turns a host-provided battery telemetry handle into a stream of
//! immutable [`BatterySnapshot`]s. Hosts expose the handle through
//! [`TelemetryHost`]; [`subscribe`] mirrors the handle into snapshots and
//! re-mirrors on each of the four change notifications.
//!
//! # Hosts
//!
//! - UPower over the system D-Bus ([`upower::UPowerHost`])
//! - In-memory mock for tests and demos ([`mock::MockHost`])
//!
//! # Example
//!
//! ```no_run
//! use chargeview_hal::{subscribe, upower::UPowerHost};
//!
//! # async fn run() {
//! let mut subscription = subscribe(&UPowerHost::new()).await;
//! while let Some(snapshot) = subscription.changed().await {
//!     println!("{:.0}% charging={}", snapshot.level, snapshot.charging);
//! }
//! # }
//! ```

pub mod mock;
pub mod snapshot;
pub mod subscription;
pub mod telemetry;
pub mod upower;

pub use snapshot::{BatterySnapshot, TimeEstimate};
pub use subscription::{Subscription, subscribe};
pub use telemetry::{
    BatteryEvent, BatteryTelemetry, Capability, Listener, ListenerId, ListenerRegistry,
    TelemetryError, TelemetryHost,
};

/// Telemetry result type
pub type Result<T> = std::result::Result<T, TelemetryError>;
