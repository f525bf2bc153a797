//! Discrete gate for multi-bit digital signals.
//!
//! Hats and selector switches report small integers rather than levels. A
//! changed value is held back until it has been stable for the minimum hold
//! time, then promoted; a value that bounces away before the timer expires is
//! never seen downstream.

/// State for the discrete gate.
///
/// # RT Safety
///
/// - `#[repr(C)]`, `Copy`, no heap
/// - O(1), bounded execution time
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscreteGateState {
    /// Last promoted (visible) value.
    pub prev_filtered: f32,
    /// Raw value seen on the previous tick.
    pub prev_raw: f32,
    /// Candidate value being timed.
    pub pending: f32,
    /// Timestamp the candidate appeared, if a change is being timed.
    pub rise_time: Option<f64>,
    /// Whether a first sample has been observed.
    pub initialized: bool,
}

impl DiscreteGateState {
    /// Fresh, uninitialized state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prev_filtered: 0.0,
            prev_raw: 0.0,
            pending: 0.0,
            rise_time: None,
            initialized: false,
        }
    }

    /// Reset to the uninitialized state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Advance the gate one tick and return the filtered value.
#[inline]
pub fn discrete_gate_filter(
    state: &mut DiscreteGateState,
    t: f64,
    raw: f32,
    min_hold_sec: f64,
) -> f32 {
    if !state.initialized {
        state.initialized = true;
        state.prev_filtered = raw;
        state.prev_raw = raw;
        state.pending = raw;
        state.rise_time = None;
        return raw;
    }

    let out = if raw != state.prev_raw {
        // Value changed: start/refresh the hold timer, keep showing the old
        // value.
        state.rise_time = Some(t);
        state.pending = raw;
        state.prev_filtered
    } else {
        match state.rise_time {
            Some(rise)
                if t - rise >= min_hold_sec
                    && state.pending == raw
                    && raw != state.prev_filtered =>
            {
                state.rise_time = None;
                state.prev_filtered = raw;
                raw
            }
            _ => state.prev_filtered,
        }
    };
    state.prev_raw = raw;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &mut DiscreteGateState, seq: &[(f64, f32)], hold: f64) -> Vec<f32> {
        seq.iter()
            .map(|&(t, v)| discrete_gate_filter(state, t, v, hold))
            .collect()
    }

    #[test]
    fn test_first_sample_passes_through() {
        let mut state = DiscreteGateState::new();
        assert_eq!(discrete_gate_filter(&mut state, 0.0, 7.0, 0.005), 7.0);
    }

    #[test]
    fn test_stable_change_promotes_after_hold() {
        let mut state = DiscreteGateState::new();
        let out = run(
            &mut state,
            &[
                (0.000, 0.0), // init
                (0.001, 3.0), // change: hold old
                (0.002, 3.0), // stable, 1 ms: hold old
                (0.007, 3.0), // stable, 6 ms: promote
                (0.008, 3.0), // steady
            ],
            0.005,
        );
        assert_eq!(out, vec![0.0, 0.0, 0.0, 3.0, 3.0]);
    }

    #[test]
    fn test_bounce_never_promotes() {
        let mut state = DiscreteGateState::new();
        let out = run(
            &mut state,
            &[
                (0.000, 0.0),
                (0.001, 5.0), // flicker in
                (0.002, 0.0), // flicker out: timer restarts for 0
                (0.003, 0.0), // 0 == prev_filtered: nothing to promote
                (0.010, 0.0),
            ],
            0.005,
        );
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rapid_changes_keep_refreshing_timer() {
        let mut state = DiscreteGateState::new();
        let out = run(
            &mut state,
            &[
                (0.000, 0.0),
                (0.001, 1.0),
                (0.002, 2.0),
                (0.003, 3.0), // each change restarts the timer
                (0.004, 3.0),
                (0.009, 3.0), // stable 6 ms after last change: promote
            ],
            0.005,
        );
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_constant_input_is_identity() {
        let mut state = DiscreteGateState::new();
        for i in 0..100 {
            assert_eq!(
                discrete_gate_filter(&mut state, i as f64 * 1e-3, 9.0, 0.005),
                9.0
            );
        }
    }
}
