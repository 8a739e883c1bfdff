//! The activity state machine: debounces raw input signals into a single
//! authoritative user state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::event::{notify, Callback, MonitorEvent, Subscribers};
use crate::signal::{Signal, SignalSource};

/// User activity state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivityState {
    /// Monitoring has not started yet, or has been stopped.
    #[default]
    Unknown,
    /// No qualifying signal for at least the configured window.
    Inactive,
    /// The user interacted within the configured window.
    Active,
}

/// Mutable monitor state, exclusively owned behind the monitor's mutex.
struct Inner {
    started: bool,
    current_state: ActivityState,
    /// Idle ticks elapsed since the last qualifying activity signal.
    idle_ticks: u64,
    /// When the last qualifying signal arrived (or monitoring started).
    last_signal_at: Option<DateTime<Utc>>,
    source: Box<dyn SignalSource>,
    subscribers: Subscribers,
    state_tx: broadcast::Sender<ActivityState>,
    tick_task: Option<JoinHandle<()>>,
    pump_task: Option<JoinHandle<()>>,
    debounce_task: Option<JoinHandle<()>>,
    /// Bumped on every re-arm and cancel; a stale debounce expiry is a no-op.
    debounce_generation: u64,
}

impl Inner {
    /// Apply a state transition and return the callbacks it owes.
    ///
    /// Emits the event named after the destination state iff the state
    /// actually changed, or unconditionally when `force` is set (replay).
    fn transition(&mut self, next: ActivityState, force: bool) -> Vec<Callback> {
        if self.current_state == next && !force {
            return Vec::new();
        }
        self.current_state = next;
        match next {
            ActivityState::Active => {
                debug!("User became active");
                let _ = self.state_tx.send(next);
                self.subscribers.snapshot(MonitorEvent::Active)
            }
            ActivityState::Inactive => {
                debug!(idle_ticks = self.idle_ticks, "User became inactive");
                let _ = self.state_tx.send(next);
                self.subscribers.snapshot(MonitorEvent::Inactive)
            }
            ActivityState::Unknown => Vec::new(),
        }
    }

    /// Advance the idle counter by one tick and evaluate the candidate state.
    fn tick(&mut self, inactive_after: u64) -> Vec<Callback> {
        self.idle_ticks += 1;
        let next = if self.idle_ticks >= inactive_after {
            ActivityState::Inactive
        } else {
            ActivityState::Active
        };
        self.transition(next, false)
    }

    /// A qualifying activity signal: the only path that resets the counter.
    fn flag_active(&mut self) -> Vec<Callback> {
        self.idle_ticks = 0;
        self.last_signal_at = Some(Utc::now());
        self.cancel_debounce();
        self.transition(ActivityState::Active, false)
    }

    fn cancel_debounce(&mut self) {
        self.debounce_generation = self.debounce_generation.wrapping_add(1);
        if let Some(task) = self.debounce_task.take() {
            task.abort();
        }
    }
}

/// Monitors user activity and notifies subscribers of state transitions.
///
/// Raw signals arrive from an attached [`SignalSource`]; the monitor folds
/// them into an [`ActivityState`] using a periodic idle tick and a short
/// focus-loss debounce.
pub struct ActivityMonitor {
    config: MonitorConfig,
    inner: Arc<Mutex<Inner>>,
    state_tx: broadcast::Sender<ActivityState>,
}

impl ActivityMonitor {
    /// Create a monitor over the given signal source.
    ///
    /// Monitoring does not begin until [`start`](Self::start).
    pub fn new(config: MonitorConfig, source: impl SignalSource + 'static) -> Self {
        let (state_tx, _) = broadcast::channel(16);

        let inner = Inner {
            started: false,
            current_state: ActivityState::Unknown,
            idle_ticks: 0,
            last_signal_at: None,
            source: Box::new(source),
            subscribers: Subscribers::default(),
            state_tx: state_tx.clone(),
            tick_task: None,
            pump_task: None,
            debounce_task: None,
            debounce_generation: 0,
        };

        Self {
            config,
            inner: Arc::new(Mutex::new(inner)),
            state_tx,
        }
    }

    /// The configuration this monitor was built with.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Begin monitoring user activity.
    ///
    /// Attaches the signal source for every enabled signal kind, spawns the
    /// periodic idle tick and emits `Started`. Returns `false` if monitoring
    /// is already running. Must be called within a Tokio runtime.
    pub fn start(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.started {
            return false;
        }
        inner.started = true;
        inner.last_signal_at = Some(Utc::now());

        let (tx, rx) = mpsc::unbounded_channel();
        for kind in self.config.enabled_signals() {
            inner.source.attach(kind, tx.clone());
        }
        drop(tx);

        let shared = Arc::clone(&self.inner);
        let config = self.config.clone();
        inner.pump_task = Some(tokio::spawn(run_signal_pump(shared, config, rx)));

        let shared = Arc::clone(&self.inner);
        let period = self.config.tick_period();
        let inactive_after = self.config.inactive_after_secs;
        inner.tick_task = Some(tokio::spawn(async move {
            // First tick fires one full period after start.
            let mut ticks = time::interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                let mut inner = shared.lock();
                if !inner.started {
                    return;
                }
                let callbacks = inner.tick(inactive_after);
                drop(inner);
                notify(&callbacks);
            }
        }));

        info!(
            inactive_after = self.config.inactive_after_secs,
            "Starting activity monitor"
        );

        let callbacks = inner.subscribers.snapshot(MonitorEvent::Started);
        drop(inner);
        notify(&callbacks);
        true
    }

    /// Stop monitoring.
    ///
    /// Cancels the tick and any pending debounce, detaches the signal source
    /// symmetrically to `start`, resets the state to `Unknown` and emits
    /// `Stopped`. No transition or emission occurs after this returns until
    /// the next `start`. Returns `false` if monitoring was not running.
    pub fn stop(&self) -> bool {
        let mut inner = self.inner.lock();
        if !inner.started {
            return false;
        }
        inner.started = false;
        inner.current_state = ActivityState::Unknown;

        if let Some(task) = inner.tick_task.take() {
            task.abort();
        }
        if let Some(task) = inner.pump_task.take() {
            task.abort();
        }
        inner.cancel_debounce();

        for kind in self.config.enabled_signals() {
            inner.source.detach(kind);
        }

        info!("Activity monitor stopped");

        let callbacks = inner.subscribers.snapshot(MonitorEvent::Stopped);
        drop(inner);
        notify(&callbacks);
        true
    }

    /// Get the current activity state.
    pub fn state(&self) -> ActivityState {
        self.inner.lock().current_state
    }

    /// When the current inactivity began, if the user is inactive.
    ///
    /// This is the timestamp of the last qualifying signal, or of `start()`
    /// when none has arrived since.
    pub fn inactive_since(&self) -> Option<DateTime<Utc>> {
        let inner = self.inner.lock();
        match inner.current_state {
            ActivityState::Inactive => inner.last_signal_at,
            _ => None,
        }
    }

    /// Register a callback for an event.
    ///
    /// Callbacks for the same event run in registration order, synchronously
    /// at emission time. There is no unregistration facility.
    pub fn on(&self, event: MonitorEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.inner.lock().subscribers.push(event, Arc::new(callback));
    }

    /// Subscribe to `Active`/`Inactive` transitions as an async stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityState> {
        self.state_tx.subscribe()
    }

    /// Re-emit the event matching the current state without changing it.
    ///
    /// Lets a late subscriber learn the current state without waiting for
    /// the next natural transition. No effect while the state is `Unknown`.
    pub fn replay_state(&self) {
        let mut inner = self.inner.lock();
        let current = inner.current_state;
        let callbacks = inner.transition(current, true);
        drop(inner);
        notify(&callbacks);
    }
}

impl Drop for ActivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drain signals from the source and fold them into the state machine.
async fn run_signal_pump(
    shared: Arc<Mutex<Inner>>,
    config: MonitorConfig,
    mut rx: mpsc::UnboundedReceiver<Signal>,
) {
    while let Some(signal) = rx.recv().await {
        handle_signal(&shared, &config, signal);
    }
}

/// Fold one raw signal into the state machine, honoring the config gates.
fn handle_signal(shared: &Arc<Mutex<Inner>>, config: &MonitorConfig, signal: Signal) {
    let mut inner = shared.lock();
    if !inner.started {
        return;
    }
    let callbacks = match signal {
        Signal::PointerMove if config.inactive_on_mouse_inactivity => inner.flag_active(),
        Signal::KeyPress if config.inactive_on_keyboard_inactivity => inner.flag_active(),
        Signal::Focus if config.inactive_on_lost_focus => inner.flag_active(),
        Signal::Blur if config.inactive_on_lost_focus => {
            arm_debounce(shared, &mut inner, config);
            Vec::new()
        }
        // Hiding the surface counts as activity; becoming visible again is a
        // candidate inactivity signal. Only a subsequent pointer or key
        // signal proves the user is back.
        Signal::VisibilityChange { hidden: true } if config.inactive_on_no_visibility => {
            inner.flag_active()
        }
        Signal::VisibilityChange { hidden: false } if config.inactive_on_no_visibility => {
            inner.transition(ActivityState::Inactive, false)
        }
        _ => Vec::new(),
    };
    drop(inner);
    notify(&callbacks);
}

/// (Re-)arm the focus-loss debounce. If no qualifying signal lands before it
/// expires, the user is flagged inactive regardless of the idle counter.
fn arm_debounce(shared: &Arc<Mutex<Inner>>, inner: &mut Inner, config: &MonitorConfig) {
    inner.cancel_debounce();
    let generation = inner.debounce_generation;
    let delay = config.blur_debounce();
    let shared = Arc::clone(shared);
    inner.debounce_task = Some(tokio::spawn(async move {
        time::sleep(delay).await;
        let mut inner = shared.lock();
        if !inner.started || inner.debounce_generation != generation {
            return;
        }
        inner.debounce_task = None;
        debug!("Focus-loss debounce elapsed");
        let callbacks = inner.transition(ActivityState::Inactive, false);
        drop(inner);
        notify(&callbacks);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unknown() {
        assert_eq!(ActivityState::default(), ActivityState::Unknown);
    }
}
