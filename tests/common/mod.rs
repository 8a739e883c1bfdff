//! Shared test support: an in-memory signal source.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use vigil::{Signal, SignalKind, SignalSender, SignalSource};

/// Install an opt-in tracing subscriber for test runs.
///
/// Quiet by default; `RUST_LOG=vigil=debug cargo test -- --nocapture` shows
/// the monitor's transition logs. Safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_test_writer())
        .with(filter)
        .try_init();
}

/// A scriptable signal source backed by shared channel handles.
///
/// Clones share the same attachment table, so a test can keep one handle
/// while the monitor owns another.
#[derive(Clone, Default)]
pub struct TestSource {
    channels: Arc<Mutex<HashMap<SignalKind, SignalSender>>>,
}

impl TestSource {
    /// Deliver a signal, if its kind is currently attached.
    pub fn emit(&self, signal: Signal) {
        if let Some(tx) = self.channels.lock().get(&signal.kind()) {
            let _ = tx.send(signal);
        }
    }

    /// Whether the given kind is currently attached.
    pub fn is_attached(&self, kind: SignalKind) -> bool {
        self.channels.lock().contains_key(&kind)
    }

    /// How many kinds are currently attached.
    pub fn attached_count(&self) -> usize {
        self.channels.lock().len()
    }
}

impl SignalSource for TestSource {
    fn attach(&mut self, kind: SignalKind, tx: SignalSender) {
        self.channels.lock().insert(kind, tx);
    }

    fn detach(&mut self, kind: SignalKind) {
        self.channels.lock().remove(&kind);
    }
}
