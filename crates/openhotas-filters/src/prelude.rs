//! Prelude for the filters crate.

pub use crate::bank::FilterBank;
pub use crate::discrete::{discrete_gate_filter, DiscreteGateState};
pub use crate::gate::{binary_gate_filter, BinaryGateState};
pub use crate::params::{FilterParams, SignalMode};
pub use crate::rate_limit::{rate_limit_filter, RateLimitState};
