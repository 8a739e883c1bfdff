//! Process-wide convenience wrapper around a single [`ActivityMonitor`].
//!
//! A thin optional layer over the core: the first `configure` (or `detect`)
//! call constructs the one shared monitor, and `detect` bridges its
//! `Active`/`Inactive` transitions onto a broadcast channel of
//! [`UserNotification`]s. Hosts that want explicit ownership should construct
//! an [`ActivityMonitor`] directly instead.

use once_cell::sync::OnceCell;
use tokio::sync::broadcast;

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::event::MonitorEvent;
use crate::monitor::{ActivityMonitor, ActivityState};
use crate::signal::SignalSource;

static MONITOR: OnceCell<ActivityMonitor> = OnceCell::new();
static NOTIFICATIONS: OnceCell<broadcast::Sender<UserNotification>> = OnceCell::new();

/// Environment-level notification mirroring `Active`/`Inactive` transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserNotification {
    UserActive,
    UserInactive,
}

/// Construct the shared monitor, or return the existing one.
///
/// Only the first call constructs; later calls return the existing instance
/// and their arguments are dropped unused.
pub fn configure(
    config: MonitorConfig,
    source: impl SignalSource + 'static,
) -> &'static ActivityMonitor {
    MONITOR.get_or_init(|| ActivityMonitor::new(config, source))
}

/// Start shared activity detection.
///
/// Lazily configures the monitor with defaults, wires its `Active` and
/// `Inactive` events to the [`notifications`] broadcast (exactly once) and
/// starts it. Idempotent; must be called within a Tokio runtime.
pub fn detect(source: impl SignalSource + 'static) -> bool {
    let monitor = configure(MonitorConfig::default(), source);

    NOTIFICATIONS.get_or_init(|| {
        let (tx, _) = broadcast::channel(16);

        let active_tx = tx.clone();
        monitor.on(MonitorEvent::Active, move || {
            let _ = active_tx.send(UserNotification::UserActive);
        });
        let inactive_tx = tx.clone();
        monitor.on(MonitorEvent::Inactive, move || {
            let _ = inactive_tx.send(UserNotification::UserInactive);
        });

        monitor.start();
        tx
    });

    true
}

/// Subscribe to the user notifications wired by [`detect`].
pub fn notifications() -> Result<broadcast::Receiver<UserNotification>, MonitorError> {
    NOTIFICATIONS
        .get()
        .map(|tx| tx.subscribe())
        .ok_or(MonitorError::NotDetecting)
}

/// Register a callback on the shared monitor.
pub fn on(
    event: MonitorEvent,
    callback: impl Fn() + Send + Sync + 'static,
) -> Result<(), MonitorError> {
    instance()?.on(event, callback);
    Ok(())
}

/// The shared monitor's current state.
pub fn state() -> Result<ActivityState, MonitorError> {
    Ok(instance()?.state())
}

/// Replay the shared monitor's current state to its subscribers.
pub fn replay_state() -> Result<(), MonitorError> {
    instance()?.replay_state();
    Ok(())
}

fn instance() -> Result<&'static ActivityMonitor, MonitorError> {
    MONITOR.get().ok_or(MonitorError::NotConfigured)
}
