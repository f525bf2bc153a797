//! Hot-swappable shared controls.
//!
//! Everything the control surface can change while the loop runs is an
//! atomic scalar with release/acquire ordering: a store becomes visible no
//! later than the next tick that loads it, and the tick never takes a lock to
//! read its parameters.

use openhotas_atomic::{AtomicF32, AtomicF64};
use openhotas_filters::{FilterParams, SignalMode};
use openhotas_signal_map::{DeviceKind, SignalKey, SignalMap};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

const fn device_index(kind: DeviceKind) -> usize {
    match kind {
        DeviceKind::Stick => 0,
        DeviceKind::Throttle => 1,
        DeviceKind::Gamepad => 2,
    }
}

/// Accepted range for the analog rate percentage.
pub const ANALOG_RATE_RANGE: (f32, f32) = (0.0, 100.0);

/// Accepted range for the digital minimum hold, seconds.
pub const DIGITAL_HOLD_RANGE: (f64, f64) = (0.0, 0.5);

/// Shared control state read by the acquisition thread each tick.
#[derive(Debug)]
pub struct SharedControls {
    analog_rate_pct: AtomicF32,
    digital_min_hold_sec: AtomicF64,
    modes: Vec<AtomicU8>,
    mode_index: HashMap<SignalKey, usize>,
    trigger_left_digital: AtomicBool,
    trigger_right_digital: AtomicBool,
    output_enabled: AtomicBool,
    test_pulse: AtomicBool,
    running: AtomicBool,
    device_connected: [AtomicBool; 3],
}

impl SharedControls {
    /// Build controls for the signals in `map`, all modes `None`.
    #[must_use]
    pub fn new(map: &SignalMap) -> Self {
        let defaults = FilterParams::default();
        let mut modes = Vec::with_capacity(map.len());
        let mut mode_index = HashMap::with_capacity(map.len());
        for descriptor in map.descriptors() {
            mode_index.insert(descriptor.key.clone(), modes.len());
            modes.push(AtomicU8::new(SignalMode::None as u8));
        }
        Self {
            analog_rate_pct: AtomicF32::new(defaults.analog_rate_pct),
            digital_min_hold_sec: AtomicF64::new(defaults.digital_min_hold_sec),
            modes,
            mode_index,
            trigger_left_digital: AtomicBool::new(false),
            trigger_right_digital: AtomicBool::new(false),
            output_enabled: AtomicBool::new(false),
            test_pulse: AtomicBool::new(false),
            running: AtomicBool::new(false),
            device_connected: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    /// Current filter parameters.
    #[must_use]
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            analog_rate_pct: self.analog_rate_pct.load(),
            digital_min_hold_sec: self.digital_min_hold_sec.load(),
        }
    }

    /// Mode of the signal at `slot`.
    #[must_use]
    pub fn mode_at(&self, slot: usize) -> SignalMode {
        SignalMode::from_u8(self.modes[slot].load(Ordering::Acquire))
    }

    /// Mode of a signal by key; `None` mode for unknown keys.
    #[must_use]
    pub fn mode_of(&self, key: &SignalKey) -> SignalMode {
        self.mode_index
            .get(key)
            .map_or(SignalMode::None, |&slot| self.mode_at(slot))
    }

    /// Trigger digital-force flags `(left, right)`.
    #[must_use]
    pub fn trigger_digital(&self) -> (bool, bool) {
        (
            self.trigger_left_digital.load(Ordering::Acquire),
            self.trigger_right_digital.load(Ordering::Acquire),
        )
    }

    /// Whether virtual output is desired on.
    #[must_use]
    pub fn output_enabled(&self) -> bool {
        self.output_enabled.load(Ordering::Acquire)
    }

    /// Store the output-enable desire. The publisher clears it on a fatal
    /// enable failure so re-enabling requires an explicit new request.
    pub fn set_output_enabled(&self, enabled: bool) {
        self.output_enabled.store(enabled, Ordering::Release);
    }

    /// Consume an armed test pulse, if any.
    #[must_use]
    pub fn take_test_pulse(&self) -> bool {
        self.test_pulse.swap(false, Ordering::AcqRel)
    }

    /// Whether a device of `kind` is currently connected.
    ///
    /// Connection is handle visibility, independent of report freshness: a
    /// plugged-but-idle device still reads as connected.
    #[must_use]
    pub fn device_connected(&self, kind: DeviceKind) -> bool {
        self.device_connected[device_index(kind)].load(Ordering::Acquire)
    }

    /// Record a device's connection state. Acquisition thread only.
    pub(crate) fn set_device_connected(&self, kind: DeviceKind, connected: bool) {
        self.device_connected[device_index(kind)].store(connected, Ordering::Release);
    }

    /// Whether the loop should keep running.
    #[must_use]
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Set the running flag.
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }
}

/// Thread-safe setters handed to UIs and config appliers.
///
/// Out-of-range values are clamped with a warning; the warning fires once per
/// parameter, not once per store.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    shared: Arc<SharedControls>,
    warned_rate: Arc<AtomicBool>,
    warned_hold: Arc<AtomicBool>,
}

impl ControlSurface {
    /// Wrap shared controls.
    #[must_use]
    pub fn new(shared: Arc<SharedControls>) -> Self {
        Self {
            shared,
            warned_rate: Arc::new(AtomicBool::new(false)),
            warned_hold: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the analog rate percentage, clamped to `[0, 100]`.
    pub fn set_analog_rate_pct(&self, pct: f32) {
        let (lo, hi) = ANALOG_RATE_RANGE;
        let clamped = pct.clamp(lo, hi);
        if clamped != pct && !self.warned_rate.swap(true, Ordering::AcqRel) {
            tracing::warn!(requested = pct, applied = clamped, "analog_rate_pct out of range");
        }
        self.shared.analog_rate_pct.store(clamped);
    }

    /// Set the digital minimum hold, clamped to `[0, 0.5]` seconds.
    pub fn set_digital_min_hold_sec(&self, secs: f64) {
        let (lo, hi) = DIGITAL_HOLD_RANGE;
        let clamped = secs.clamp(lo, hi);
        if clamped != secs && !self.warned_hold.swap(true, Ordering::AcqRel) {
            tracing::warn!(
                requested = secs,
                applied = clamped,
                "digital_min_hold_sec out of range"
            );
        }
        self.shared.digital_min_hold_sec.store(clamped);
    }

    /// Set one signal's filter mode. Unknown keys are ignored with a warning.
    pub fn set_signal_mode(&self, key: &SignalKey, mode: SignalMode) {
        match self.shared.mode_index.get(key) {
            Some(&slot) => self.shared.modes[slot].store(mode as u8, Ordering::Release),
            None => tracing::warn!(%key, "mode set for unknown signal"),
        }
    }

    /// Set the per-trigger digital-force flags.
    pub fn set_trigger_digital(&self, left: bool, right: bool) {
        self.shared
            .trigger_left_digital
            .store(left, Ordering::Release);
        self.shared
            .trigger_right_digital
            .store(right, Ordering::Release);
    }

    /// Request virtual output on or off.
    pub fn set_virtual_output(&self, enabled: bool) {
        self.shared.set_output_enabled(enabled);
    }

    /// Arm a one-shot test pulse on the virtual output.
    pub fn trigger_test_pulse(&self) {
        self.shared.test_pulse.store(true, Ordering::Release);
    }

    /// The underlying shared controls.
    #[must_use]
    pub fn shared(&self) -> &Arc<SharedControls> {
        &self.shared
    }
}
