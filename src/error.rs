//! Typed errors for the public surface.

use thiserror::Error;

/// Errors raised by the process-wide convenience wrapper.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The wrapper was used before `configure()` or `detect()`.
    #[error("activity monitoring has not been configured; call configure() or detect() first")]
    NotConfigured,
    /// Notifications were requested before `detect()` wired them.
    #[error("activity detection has not been started; call detect() first")]
    NotDetecting,
}
