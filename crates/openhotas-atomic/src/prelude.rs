//! Prelude for the atomic primitives crate.

pub use crate::cell::{AtomicF32, AtomicF64};
pub use crate::mailbox::StatsMailbox;
pub use crate::queue::EventQueue;
pub use crate::ring::{Sample, SampleRing};
