//! Virtual gamepad report format and OS output contracts.
//!
//! The publisher converts resolved logical outputs into a [`PadReport`] — an
//! Xbox-360-style report with a fixed button bit assignment — and hands it to
//! a [`VirtualPad`] backend. Keyboard and mouse output go through
//! [`SyntheticInput`]. Both backends are out-of-core collaborators; mocks for
//! tests live in [`mock`].

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod mock;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod synthetic;
pub mod virtual_pad;

pub use mock::{MockSyntheticInput, MockVirtualPad};
pub use report::{axis_to_wire, trigger_to_wire, PadReport};
pub use scan::scan_code_for_vk;
pub use synthetic::{KeyRepeatTiming, SyntheticInput};
pub use virtual_pad::VirtualPad;

use thiserror::Error;

/// Errors surfaced by output backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PadError {
    /// The backend's bus/driver is not present.
    #[error("BUS_NOT_FOUND")]
    BusNotFound,

    /// The bus has no free slot for another virtual target.
    #[error("NO_FREE_SLOT")]
    NoFreeSlot,

    /// The target is not plugged in.
    #[error("TARGET_NOT_PLUGGED_IN")]
    TargetNotPluggedIn,

    /// A transient update failure; retry next tick.
    #[error("update failed: {0}")]
    UpdateFailed(String),

    /// Synthetic input injection failed.
    #[error("input injection failed: {0}")]
    InjectionFailed(String),
}

impl PadError {
    /// Whether this error ends an enable attempt (requires explicit
    /// re-enable) rather than a per-tick retry.
    #[must_use]
    pub fn is_fatal_for_enable(&self) -> bool {
        matches!(self, Self::BusNotFound | Self::NoFreeSlot)
    }
}

/// Result alias for output-backend operations.
pub type PadResult<T = ()> = Result<T, PadError>;
