//! Configuration loading from TOML files and environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::signal::SignalKind;

/// Monitor configuration.
///
/// Missing keys take defaults; unrecognized keys are preserved in `extra`
/// but otherwise ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Consecutive idle ticks before the user is considered inactive.
    /// Ticks fire once per `tick_period_ms`, one second by default.
    #[serde(default = "default_inactive_after")]
    pub inactive_after_secs: u64,
    /// Whether losing window focus is a candidate inactivity signal.
    #[serde(default = "default_true")]
    pub inactive_on_lost_focus: bool,
    /// Whether surface visibility changes are re-evaluated.
    #[serde(default = "default_true")]
    pub inactive_on_no_visibility: bool,
    /// Whether pointer movement counts as an activity signal.
    #[serde(default = "default_true")]
    pub inactive_on_mouse_inactivity: bool,
    /// Whether key presses count as an activity signal.
    #[serde(default = "default_true")]
    pub inactive_on_keyboard_inactivity: bool,
    /// Idle tick period in milliseconds.
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Focus-loss debounce in milliseconds.
    #[serde(default = "default_blur_debounce_ms")]
    pub blur_debounce_ms: u64,
    /// Unrecognized keys, carried along untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            inactive_after_secs: default_inactive_after(),
            inactive_on_lost_focus: true,
            inactive_on_no_visibility: true,
            inactive_on_mouse_inactivity: true,
            inactive_on_keyboard_inactivity: true,
            tick_period_ms: default_tick_period_ms(),
            blur_debounce_ms: default_blur_debounce_ms(),
            extra: BTreeMap::new(),
        }
    }
}

impl MonitorConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn blur_debounce(&self) -> Duration {
        Duration::from_millis(self.blur_debounce_ms)
    }

    /// The signal kinds the monitor attaches, per the enabled flags.
    pub(crate) fn enabled_signals(&self) -> Vec<SignalKind> {
        let mut kinds = Vec::new();
        if self.inactive_on_mouse_inactivity {
            kinds.push(SignalKind::PointerMove);
        }
        if self.inactive_on_keyboard_inactivity {
            kinds.push(SignalKind::KeyPress);
        }
        if self.inactive_on_lost_focus {
            kinds.push(SignalKind::Blur);
            kinds.push(SignalKind::Focus);
        }
        if self.inactive_on_no_visibility {
            kinds.push(SignalKind::Visibility);
        }
        kinds
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: MonitorConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Tries an explicit path first, then the user config directory, then
    /// falls back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = config_path {
            Self::from_file(path)?
        } else {
            let default_path = dirs::config_dir()
                .map(|d| d.join("vigil/config.toml"))
                .unwrap_or_else(|| PathBuf::from("vigil.toml"));
            if default_path.exists() {
                Self::from_file(&default_path)?
            } else {
                Self::default()
            }
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VIGIL_INACTIVE_AFTER") {
            if let Ok(v) = val.parse() {
                self.inactive_after_secs = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_TICK_PERIOD_MS") {
            if let Ok(v) = val.parse() {
                self.tick_period_ms = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_BLUR_DEBOUNCE_MS") {
            if let Ok(v) = val.parse() {
                self.blur_debounce_ms = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_INACTIVE_ON_LOST_FOCUS") {
            if let Ok(v) = val.parse() {
                self.inactive_on_lost_focus = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_INACTIVE_ON_NO_VISIBILITY") {
            if let Ok(v) = val.parse() {
                self.inactive_on_no_visibility = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_INACTIVE_ON_MOUSE_INACTIVITY") {
            if let Ok(v) = val.parse() {
                self.inactive_on_mouse_inactivity = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_INACTIVE_ON_KEYBOARD_INACTIVITY") {
            if let Ok(v) = val.parse() {
                self.inactive_on_keyboard_inactivity = v;
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.inactive_after_secs == 0 {
            anyhow::bail!("Inactivity threshold must be greater than 0");
        }
        if self.tick_period_ms == 0 {
            anyhow::bail!("Tick period must be greater than 0");
        }
        Ok(())
    }
}

// Default value functions
fn default_inactive_after() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_tick_period_ms() -> u64 {
    1000
}

fn default_blur_debounce_ms() -> u64 {
    50
}
