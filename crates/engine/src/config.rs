//! Runtime configuration consumed by the core.
//!
//! The settings file itself is parsed by an external collaborator; the core
//! consumes this struct and applies it through the control surface, clamping
//! out-of-range values with a warning.

use crate::control::ControlSurface;
use crate::store::SignalStore;
use openhotas_filters::SignalMode;
use openhotas_signal_map::SignalKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The config keys the core consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Analog rate limit, percent of full range per tick.
    pub analog_rate_pct: f32,
    /// Digital minimum hold, seconds.
    pub digital_min_hold_sec: f64,
    /// Snapshot window length, seconds.
    pub window_seconds: f64,
    /// Per-signal filter modes, keyed `<device>:<id>`.
    pub per_signal_mode: BTreeMap<String, SignalModeConfig>,
    /// Treat the left trigger as digital.
    pub trigger_left_digital: bool,
    /// Treat the right trigger as digital.
    pub trigger_right_digital: bool,
    /// Whether virtual output starts enabled.
    pub virtual_output_enabled: bool,
}

/// Persisted form of a signal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalModeConfig {
    /// No filtering.
    #[default]
    None,
    /// Digital gating.
    Digital,
    /// Analog rate limit.
    Analog,
}

impl From<SignalModeConfig> for SignalMode {
    fn from(mode: SignalModeConfig) -> Self {
        match mode {
            SignalModeConfig::None => Self::None,
            SignalModeConfig::Digital => Self::Digital,
            SignalModeConfig::Analog => Self::Analog,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            analog_rate_pct: 12.5,
            digital_min_hold_sec: 0.005,
            window_seconds: 30.0,
            per_signal_mode: BTreeMap::new(),
            trigger_left_digital: false,
            trigger_right_digital: false,
            virtual_output_enabled: false,
        }
    }
}

impl RuntimeConfig {
    /// Apply this configuration through the control surface and store.
    ///
    /// Unknown signal keys and out-of-range values are handled by the
    /// setters (warn once, clamp).
    pub fn apply(&self, controls: &ControlSurface, store: &SignalStore) {
        controls.set_analog_rate_pct(self.analog_rate_pct);
        controls.set_digital_min_hold_sec(self.digital_min_hold_sec);
        controls.set_trigger_digital(self.trigger_left_digital, self.trigger_right_digital);
        controls.set_virtual_output(self.virtual_output_enabled);
        store.set_window_seconds(self.window_seconds);
        for (key, mode) in &self.per_signal_mode {
            match SignalKey::parse(key) {
                Ok(key) => controls.set_signal_mode(&key, (*mode).into()),
                Err(err) => tracing::warn!(%key, %err, "ignoring mode for unparseable signal key"),
            }
        }
    }
}
