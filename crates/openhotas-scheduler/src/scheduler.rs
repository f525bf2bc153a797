//! The fixed-interval deadline scheduler.

use crate::error::SchedulerResult;
use crate::platform;
use crate::{PERIOD_1KHZ_NS, SPIN_MARGIN_US};
use std::time::{Duration, Instant};

/// Deadline scheduler for a fixed-rate loop.
///
/// Usage per tick:
///
/// 1. do the tick's work,
/// 2. call [`TickScheduler::complete_tick`], which sleeps coarsely to
///    `wake - 800 µs`, busy-spins to the deadline, then advances the
///    deadline by one period.
///
/// If the loop fell behind by more than one full period the deadline is reset
/// to `now + period` instead of advancing, so a single stall never causes a
/// cascade of catch-up ticks.
///
/// # RT Safety
///
/// `complete_tick` is the loop's only blocking point. No allocations occur
/// after construction.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    wake: Instant,
    spin_margin: Duration,
    tick_count: u64,
}

impl TickScheduler {
    /// Create a scheduler with a 1 ms period, anchored at the current instant.
    #[must_use]
    pub fn new_1khz() -> Self {
        Self::with_period_ns(PERIOD_1KHZ_NS)
    }

    /// Create a scheduler with a custom period in nanoseconds (min 1).
    #[must_use]
    pub fn with_period_ns(period_ns: u64) -> Self {
        let period = Duration::from_nanos(period_ns.max(1));
        Self {
            period,
            wake: Instant::now() + period,
            spin_margin: Duration::from_micros(SPIN_MARGIN_US),
            tick_count: 0,
        }
    }

    /// Target period.
    #[inline]
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks completed so far.
    #[inline]
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The next wake deadline.
    #[inline]
    #[must_use]
    pub fn next_wake(&self) -> Instant {
        self.wake
    }

    /// Sleep out the remainder of the current period and advance the deadline.
    ///
    /// Coarse-sleeps until `wake - spin_margin`, then busy-waits to the
    /// deadline with a CPU pause hint. A sleep failure degrades to pure
    /// spinning rather than aborting the loop.
    pub fn complete_tick(&mut self) -> SchedulerResult {
        let sleep_target = self.wake - self.spin_margin;
        let mut result = Ok(());
        if Instant::now() < sleep_target {
            result = platform::coarse_sleep_until(sleep_target);
        }
        while Instant::now() < self.wake {
            std::hint::spin_loop();
        }

        self.tick_count += 1;
        self.wake += self.period;
        let now = Instant::now();
        if now > self.wake + self.period {
            // Fell behind by more than one period; re-anchor instead of
            // racing to catch up.
            self.wake = now + self.period;
        }
        result
    }

    /// Re-anchor the deadline at `now + period` and zero the tick count.
    pub fn reset(&mut self) {
        self.wake = Instant::now() + self.period;
        self.tick_count = 0;
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new_1khz()
    }
}
