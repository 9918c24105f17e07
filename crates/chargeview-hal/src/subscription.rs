//! Snapshot subscriptions over a telemetry host
//!
//! [`subscribe`] probes the host, requests the telemetry handle, registers one
//! listener per [`BatteryEvent`] and publishes a fresh [`BatterySnapshot`]
//! through a `watch` channel whenever any of them fires. Dropping or
//! unsubscribing the [`Subscription`] removes every listener again.

use crate::snapshot::BatterySnapshot;
use crate::telemetry::{
    BatteryEvent, BatteryTelemetry, Capability, ListenerId, TelemetryError, TelemetryHost,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Listener registrations held against a telemetry handle
struct Registration {
    telemetry: Arc<dyn BatteryTelemetry>,
    listeners: Vec<(BatteryEvent, ListenerId)>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        for (event, id) in self.listeners.drain(..) {
            if !self.telemetry.remove_listener(event, id) {
                warn!("Listener for {} was already gone", event.as_str());
            }
        }
        info!("Battery subscription released");
    }
}

/// Live battery subscription
///
/// Holds either a registration against the host (snapshots keep flowing) or
/// the error that ended the subscription before any snapshot was produced.
pub struct Subscription {
    snapshots: watch::Receiver<Option<BatterySnapshot>>,
    error: Option<TelemetryError>,
    registration: Option<Registration>,
}

/// Subscribe to battery snapshots from `host`.
///
/// Never fails outright: if the host lacks telemetry or rejects the handle
/// request, the returned subscription carries the error and never yields a
/// snapshot.
pub async fn subscribe<H: TelemetryHost + ?Sized>(host: &H) -> Subscription {
    let (tx, rx) = watch::channel(None);

    if let Capability::Unavailable(reason) = host.probe() {
        warn!("Battery telemetry not supported: {}", reason);
        return Subscription::failed(rx, TelemetryError::Unavailable(reason));
    }

    let telemetry = match host.request().await {
        Ok(telemetry) => telemetry,
        Err(e) => {
            warn!("Battery telemetry request failed: {}", e);
            return Subscription::failed(rx, e);
        }
    };

    let tx = Arc::new(tx);
    let listeners = BatteryEvent::all()
        .iter()
        .map(|&event| {
            let weak = Arc::downgrade(&telemetry);
            let tx = Arc::clone(&tx);
            let id = telemetry.add_listener(
                event,
                Arc::new(move || {
                    if let Some(telemetry) = weak.upgrade() {
                        let snapshot = BatterySnapshot::capture(telemetry.as_ref());
                        debug!(
                            "{}: level={:.1} charging={}",
                            event.as_str(),
                            snapshot.level,
                            snapshot.charging
                        );
                        tx.send_replace(Some(snapshot));
                    }
                }),
            );
            (event, id)
        })
        .collect();

    // A listener that fired during the capture already published something
    // newer; keep it.
    let initial = BatterySnapshot::capture(telemetry.as_ref());
    tx.send_if_modified(|slot| {
        if slot.is_some() {
            return false;
        }
        *slot = Some(initial);
        true
    });
    info!(
        "Battery subscription started (level={:.1}, charging={})",
        initial.level, initial.charging
    );

    Subscription {
        snapshots: rx,
        error: None,
        registration: Some(Registration {
            telemetry,
            listeners,
        }),
    }
}

impl Subscription {
    fn failed(snapshots: watch::Receiver<Option<BatterySnapshot>>, error: TelemetryError) -> Self {
        Self {
            snapshots,
            error: Some(error),
            registration: None,
        }
    }

    /// Latest snapshot, if one was ever produced
    pub fn snapshot(&self) -> Option<BatterySnapshot> {
        *self.snapshots.borrow()
    }

    /// The error that ended this subscription, if any
    pub fn error(&self) -> Option<&TelemetryError> {
        self.error.as_ref()
    }

    /// Whether listeners are still registered with the host
    pub fn is_active(&self) -> bool {
        self.registration.is_some()
    }

    /// Additional reader for the snapshot slot
    pub fn watch(&self) -> watch::Receiver<Option<BatterySnapshot>> {
        self.snapshots.clone()
    }

    /// Take the latest snapshot if it changed since the last call.
    pub fn take_update(&mut self) -> Option<BatterySnapshot> {
        if self.snapshots.has_changed().unwrap_or(false) {
            *self.snapshots.borrow_and_update()
        } else {
            None
        }
    }

    /// Wait for the next snapshot.
    ///
    /// The first call returns the initial snapshot. Returns `None` once the
    /// subscription has failed or been released.
    pub async fn changed(&mut self) -> Option<BatterySnapshot> {
        self.registration.as_ref()?;
        self.snapshots.changed().await.ok()?;
        *self.snapshots.borrow_and_update()
    }

    /// Deregister every listener. Calling this more than once, or on a
    /// subscription that never registered anything, does nothing.
    pub fn unsubscribe(&mut self) {
        self.registration.take();
    }
}
