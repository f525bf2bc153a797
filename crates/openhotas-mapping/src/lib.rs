//! User-authored input mappings.
//!
//! A mapping routes one HOTAS signal to one output: a virtual-gamepad axis or
//! button, a keyboard key, or a mouse action. This crate owns:
//!
//! - [`Action`] and its parts ([`AxisId`], [`ButtonId`], [`VirtualKey`],
//!   [`MouseOp`]), with the persisted string forms (`x360:left_x`,
//!   `keyboard:VK_SPACE`, `mouse:left_click`)
//! - [`MappingEntry`] and the mutex-protected [`MappingTable`]
//!   (upsert/remove/snapshot)
//! - [`MapResolver`]: per-tick fan-in of signal values to outputs with
//!   priority and deadband semantics
//! - [`profile`]: JSON persistence with legacy-record migration

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod action;
pub mod entry;
pub mod prelude;
pub mod profile;
pub mod resolver;
pub mod table;

pub use action::{Action, AxisId, ButtonId, MouseOp, MouseOpKind, VirtualKey};
pub use entry::MappingEntry;
pub use profile::{load_profile, save_profile, LoadOutcome, ProfileRecord};
pub use resolver::{MapResolver, ResolvedOutputs};
pub use table::MappingTable;

use thiserror::Error;

/// Errors raised by mapping parsing and persistence.
#[derive(Error, Debug)]
pub enum MappingError {
    /// An action string did not match any known form.
    #[error("unknown action {0:?}")]
    UnknownAction(String),

    /// A keyboard action named a key outside the supported catalogue.
    #[error("unknown key name {0:?}")]
    UnknownKey(String),

    /// A signal id string was malformed.
    #[error("bad signal id: {0}")]
    BadSignalId(#[from] openhotas_signal_map::SignalMapError),

    /// Profile (de)serialization failed.
    #[error("profile format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Profile I/O failed.
    #[error("profile io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;
