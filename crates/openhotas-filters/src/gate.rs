//! Gated digital debounce (binary signals).
//!
//! Every binary digital input runs a pending→promoted state machine. A
//! rising edge records its time but does not expose a high state yet; only
//! after the press has been held for the minimum hold time does it become
//! promoted (active) and visible downstream. A pulse released before
//! promotion is fully suppressed: it never reaches the rings, the resolver or
//! the virtual device. The cost is up to one hold time of latency on a
//! legitimate press.

/// State for the binary gate.
///
/// # RT Safety
///
/// - `#[repr(C)]`, `Copy`, no heap
/// - O(1), bounded execution time
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryGateState {
    /// Raw level seen on the previous tick.
    pub prev_raw_hi: bool,
    /// Timestamp of the pending rising edge, if one is being timed.
    pub rise_time: Option<f64>,
    /// Whether the press has been promoted to visible.
    pub active: bool,
}

impl BinaryGateState {
    /// Fresh idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prev_raw_hi: false,
            rise_time: None,
            active: false,
        }
    }

    /// Reset to idle.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Advance the gate one tick and return the filtered level (0.0 or 1.0).
///
/// `now_hi` is the thresholded raw level (`v_raw > 0.0`, or `>= 0.5` for a
/// trigger forced digital).
#[inline]
pub fn binary_gate_filter(
    state: &mut BinaryGateState,
    t: f64,
    now_hi: bool,
    min_hold_sec: f64,
) -> f32 {
    let prev_hi = state.prev_raw_hi;
    if now_hi && !prev_hi {
        // Rising edge: start the hold timer, stay invisible.
        state.rise_time = Some(t);
        state.active = false;
    } else if now_hi && prev_hi {
        if !state.active {
            if let Some(rise) = state.rise_time {
                if t - rise >= min_hold_sec {
                    state.active = true;
                }
            }
        }
    } else if !now_hi && prev_hi {
        // Release: promoted or not, the press ends now.
        state.active = false;
        state.rise_time = None;
    } else {
        state.rise_time = None;
        state.active = false;
    }
    state.prev_raw_hi = now_hi;
    if state.active {
        1.0
    } else {
        0.0
    }
}
