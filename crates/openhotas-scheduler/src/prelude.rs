//! Prelude module for common scheduler types.

pub use crate::clock::TickClock;
pub use crate::error::{SchedulerError, SchedulerResult};
pub use crate::platform::apply_thread_priority;
pub use crate::scheduler::TickScheduler;
pub use crate::stats::{LoopStats, PollStats, SharedPollStats};
pub use crate::{PERIOD_1KHZ_NS, SPIN_MARGIN_US};
