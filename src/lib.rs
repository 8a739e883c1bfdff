//! Vigil - user activity monitoring.
//!
//! Folds noisy input signals (pointer movement, key presses, window focus,
//! document visibility) into a single authoritative active/inactive state
//! and notifies subscribers of transitions. The host environment delivers
//! raw signals through the [`SignalSource`] contract; downstream consumers
//! observe transitions via callbacks or an async broadcast channel.

pub mod config;
pub mod error;
pub mod event;
pub mod global;
pub mod monitor;
pub mod signal;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use event::MonitorEvent;
pub use monitor::{ActivityMonitor, ActivityState};
pub use signal::{Signal, SignalKind, SignalSender, SignalSource};
