//! Lock-free primitives for the OpenHotas acquisition path.
//!
//! This crate provides the storage layer shared between the 1 kHz acquisition
//! thread and its readers:
//!
//! - [`SampleRing`]: a fixed-capacity, single-writer/multi-reader ring of
//!   timestamped samples with windowed snapshot reads
//! - [`StatsMailbox`]: a seqlock-style cell for publishing `Copy` snapshots
//! - [`AtomicF32`] / [`AtomicF64`]: bit-cast atomic floats for hot-swappable
//!   parameters
//! - [`EventQueue`]: a bounded, drop-on-overflow queue for RT-side events
//!
//! # RT Safety
//!
//! All writer-side operations are wait-free:
//! - No heap allocations after construction
//! - O(1) time complexity
//! - No syscalls, no locking
//!
//! Reader-side snapshot operations allocate and are intended for non-RT
//! consumers (plot panels, the control surface).

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod cell;
pub mod mailbox;
pub mod prelude;
pub mod queue;
pub mod ring;

pub use cell::{AtomicF32, AtomicF64};
pub use mailbox::StatsMailbox;
pub use queue::EventQueue;
pub use ring::{Sample, SampleRing};
