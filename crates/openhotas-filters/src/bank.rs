//! Per-signal filter dispatch.

use crate::discrete::{discrete_gate_filter, DiscreteGateState};
use crate::gate::{binary_gate_filter, BinaryGateState};
use crate::params::{FilterParams, SignalMode};
use crate::rate_limit::{rate_limit_filter, RateLimitState};
use openhotas_signal_map::{SignalDescriptor, SignalKey};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
enum SignalFilterState {
    RateLimit(RateLimitState),
    BinaryGate(BinaryGateState),
    DiscreteGate(DiscreteGateState),
}

/// Owns the filter state for every observed signal and routes each sample
/// through the filter selected by its mode.
///
/// State is created lazily on first observation and replaced whenever the
/// effective filter kind changes (a hot-swapped mode starts from a fresh
/// state rather than reinterpreting another filter's fields).
///
/// # RT Safety
///
/// Steady-state `apply` calls are allocation-free map lookups plus an O(1)
/// filter step; allocation happens only when a signal is first seen.
#[derive(Debug, Default)]
pub struct FilterBank {
    states: HashMap<SignalKey, SignalFilterState>,
}

impl FilterBank {
    /// Create an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample.
    ///
    /// `force_binary` marks a trigger forced into binary-digital mode: the
    /// raw value is thresholded at 0.5 and gated regardless of `mode`, and
    /// analog rate limiting is skipped.
    pub fn apply(
        &mut self,
        descriptor: &SignalDescriptor,
        mode: SignalMode,
        force_binary: bool,
        t: f64,
        raw: f32,
        params: &FilterParams,
    ) -> f32 {
        if force_binary {
            let state = self.binary_state(&descriptor.key);
            return binary_gate_filter(state, t, raw >= 0.5, params.digital_min_hold_sec);
        }
        match mode {
            SignalMode::None => {
                self.states.remove(&descriptor.key);
                raw
            }
            SignalMode::Analog => {
                let state = self.rate_limit_state(&descriptor.key);
                rate_limit_filter(state, raw, params.max_step())
            }
            SignalMode::Digital => {
                if !descriptor.analog && descriptor.bit_count > 1 {
                    let state = self.discrete_state(&descriptor.key);
                    discrete_gate_filter(state, t, raw, params.digital_min_hold_sec)
                } else {
                    // Analog sources in digital mode threshold at 0.5; true
                    // binary fields are high on any non-zero value.
                    let hi = if descriptor.analog {
                        raw >= 0.5
                    } else {
                        raw > 0.0
                    };
                    let state = self.binary_state(&descriptor.key);
                    binary_gate_filter(state, t, hi, params.digital_min_hold_sec)
                }
            }
        }
    }

    /// Drop all per-signal state.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of signals with live filter state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the bank holds no state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn rate_limit_state(&mut self, key: &SignalKey) -> &mut RateLimitState {
        let entry = self
            .states
            .entry(key.clone())
            .or_insert(SignalFilterState::RateLimit(RateLimitState::new()));
        if !matches!(entry, SignalFilterState::RateLimit(_)) {
            *entry = SignalFilterState::RateLimit(RateLimitState::new());
        }
        match entry {
            SignalFilterState::RateLimit(state) => state,
            _ => unreachable!("state variant was just normalized"),
        }
    }

    fn binary_state(&mut self, key: &SignalKey) -> &mut BinaryGateState {
        let entry = self
            .states
            .entry(key.clone())
            .or_insert(SignalFilterState::BinaryGate(BinaryGateState::new()));
        if !matches!(entry, SignalFilterState::BinaryGate(_)) {
            *entry = SignalFilterState::BinaryGate(BinaryGateState::new());
        }
        match entry {
            SignalFilterState::BinaryGate(state) => state,
            _ => unreachable!("state variant was just normalized"),
        }
    }

    fn discrete_state(&mut self, key: &SignalKey) -> &mut DiscreteGateState {
        let entry = self
            .states
            .entry(key.clone())
            .or_insert(SignalFilterState::DiscreteGate(DiscreteGateState::new()));
        if !matches!(entry, SignalFilterState::DiscreteGate(_)) {
            *entry = SignalFilterState::DiscreteGate(DiscreteGateState::new());
        }
        match entry {
            SignalFilterState::DiscreteGate(state) => state,
            _ => unreachable!("state variant was just normalized"),
        }
    }
}
