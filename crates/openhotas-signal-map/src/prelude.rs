//! Prelude for the signal-map crate.

pub use crate::bits::{extract_bits, inject_bits};
pub use crate::decode::{is_trigger_id, DecodedSignal, SignalDecoder};
pub use crate::descriptor::{SignalDescriptor, SignalMap};
pub use crate::key::{DeviceKind, SignalKey};
pub use crate::{SignalMapError, SignalMapResult};
