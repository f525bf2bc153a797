//! Fixed-interval scheduling for the OpenHotas acquisition loop.
//!
//! The acquisition thread runs at a fixed 1 kHz: do the tick's work, coarse
//! sleep to just short of the deadline, busy-spin the final stretch, advance
//! the deadline. This crate provides:
//!
//! - [`TickClock`]: monotonic seconds-since-start time source
//! - [`TickScheduler`]: the deadline scheduler with fall-behind reset
//! - [`LoopStats`] / [`PollStats`]: per-tick work EMA and rolling
//!   effective-Hz, published through a lock-free mailbox
//! - [`apply_thread_priority`]: best-effort priority bump for the loop thread
//!
//! # RT Safety
//!
//! `TickScheduler::complete_tick` is the only blocking point in the loop; it
//! performs at most one OS sleep plus a bounded busy-wait. Everything else is
//! allocation-free and O(1).

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod platform;
pub mod prelude;
pub mod scheduler;
pub mod stats;

pub use clock::TickClock;
pub use error::{SchedulerError, SchedulerResult};
pub use platform::apply_thread_priority;
pub use scheduler::TickScheduler;
pub use stats::{LoopStats, PollStats, SharedPollStats};

/// Target period for the 1 kHz loop, in nanoseconds.
pub const PERIOD_1KHZ_NS: u64 = 1_000_000;

/// Coarse-sleep margin before the deadline; the remainder is busy-waited.
pub const SPIN_MARGIN_US: u64 = 800;
