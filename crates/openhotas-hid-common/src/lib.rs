//! HID device contract and latest-report storage.
//!
//! OS-level enumeration, open and overlapped reads live outside the core
//! behind the [`DeviceSource`] trait. Per-device reader threads (owned by the
//! source implementation) publish the most recent raw report into a
//! [`ReportCell`], last-writer-wins; the acquisition thread pulls the latest
//! fresh report per device each tick and treats anything older than the
//! staleness threshold as absent.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod cell;
pub mod mock;
pub mod prelude;
pub mod source;

pub use cell::{ReportCell, STALENESS_SECS};
pub use source::{DeviceIdentity, DeviceSource, SourceHandle};

use thiserror::Error;

/// Errors raised by a device source implementation.
#[derive(Error, Debug)]
pub enum HidSourceError {
    /// No device matched the requested path.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Opening a device failed.
    #[error("failed to open device: {0}")]
    OpenFailed(String),

    /// A read failed in a way that is not a timeout.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// The device went away.
    #[error("device disconnected")]
    Disconnected,
}

/// Result alias for device-source operations.
pub type HidSourceResult<T> = Result<T, HidSourceError>;
