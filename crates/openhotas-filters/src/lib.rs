//! Per-signal ghost-input filters.
//!
//! Raw HOTAS reports carry transient micro-presses and analog spikes. Each
//! signal runs one of four deterministic filter modes, selected at runtime:
//!
//! - **None**: pass-through
//! - **Analog**: rate limit — the output may move at most
//!   `analog_rate_pct / 100 * 2.0` per tick toward the input
//! - **Digital (binary)**: pending→promoted gating — a rising edge becomes
//!   visible only after it has been held for `digital_min_hold_sec`; pulses
//!   released earlier are fully suppressed
//! - **Digital (multi-bit discrete)**: hats and selectors hold their previous
//!   value until a changed value has been stable for the hold time
//!
//! All filters are deterministic functions of the `(t, v_raw)` input
//! sequence.
//!
//! # RT Safety
//!
//! Filter steps are allocation-free and O(1). The [`FilterBank`] allocates
//! only when it first observes a new signal.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod bank;
pub mod discrete;
pub mod gate;
pub mod params;
pub mod prelude;
pub mod rate_limit;

pub use bank::FilterBank;
pub use discrete::{discrete_gate_filter, DiscreteGateState};
pub use gate::{binary_gate_filter, BinaryGateState};
pub use params::{FilterParams, SignalMode};
pub use rate_limit::{rate_limit_filter, RateLimitState};
