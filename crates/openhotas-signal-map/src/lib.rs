//! Signal identity, bit-map descriptors and report decoding.
//!
//! A HOTAS report is an opaque byte blob until a user-supplied bit-map gives
//! it meaning. This crate owns that vocabulary:
//!
//! - [`DeviceKind`] / [`SignalKey`]: device-prefixed signal identity
//!   (`stick:joy_x`), the form used by mappings and persisted settings
//! - [`SignalDescriptor`] / [`SignalMap`]: validated bit-field descriptors
//! - [`extract_bits`] / [`inject_bits`]: LSB-first bit-field access
//! - [`SignalDecoder`]: descriptor-driven decoding of a raw report into
//!   normalized logical values
//!
//! The bit-map is authoritative: no vendor HID report descriptors are
//! consulted.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod bits;
pub mod decode;
pub mod descriptor;
pub mod key;
pub mod prelude;

pub use bits::{extract_bits, inject_bits};
pub use decode::{is_trigger_id, DecodedSignal, SignalDecoder};
pub use descriptor::{SignalDescriptor, SignalMap};
pub use key::{DeviceKind, SignalKey};

use thiserror::Error;

/// Errors raised while building or validating a signal map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalMapError {
    /// `bit_count` outside the supported `1..=32` range.
    #[error("signal {key}: bit count {bit_count} outside 1..=32")]
    BitCountOutOfRange {
        /// Offending signal key.
        key: String,
        /// Rejected bit count.
        bit_count: u8,
    },

    /// Two descriptors share one key.
    #[error("duplicate signal key {0}")]
    DuplicateKey(String),

    /// A key string did not parse as `device:id`.
    #[error("malformed signal key {0:?} (expected <device>:<id>)")]
    MalformedKey(String),

    /// Unknown device prefix in a key string.
    #[error("unknown device prefix {0:?}")]
    UnknownDevice(String),
}

/// Result alias for signal-map operations.
pub type SignalMapResult<T> = Result<T, SignalMapError>;
