//! Loop statistics: work-cost EMA and rolling effective rate.

use openhotas_atomic::StatsMailbox;
use std::sync::Arc;

/// EMA smoothing factor for per-tick work cost.
const LOOP_EMA_ALPHA: f64 = 0.05;

/// Length of the effective-rate measurement window, seconds.
const RATE_WINDOW_SECS: f64 = 0.1;

/// Published loop statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollStats {
    /// Achieved loop rate over the last measurement window, Hz.
    pub effective_hz: f64,
    /// EMA of per-tick work duration, microseconds.
    pub avg_loop_us: f64,
}

/// Shared handle for reading the latest [`PollStats`].
pub type SharedPollStats = Arc<StatsMailbox<PollStats>>;

/// Accumulator owned by the acquisition thread.
///
/// Call [`LoopStats::record`] once per tick with the measured work duration;
/// every ~100 ms the accumulator publishes a fresh [`PollStats`] to the
/// shared mailbox.
///
/// # RT Safety
///
/// `record` is allocation-free; publication is a seqlock write.
#[derive(Debug)]
pub struct LoopStats {
    mailbox: SharedPollStats,
    ema_loop_us: f64,
    window_start: f64,
    window_ticks: u64,
}

impl LoopStats {
    /// Create an accumulator starting its first window at `now_secs`.
    #[must_use]
    pub fn new(now_secs: f64) -> Self {
        Self {
            mailbox: Arc::new(StatsMailbox::new(PollStats::default())),
            ema_loop_us: 0.0,
            window_start: now_secs,
            window_ticks: 0,
        }
    }

    /// Reader handle for consumers.
    #[must_use]
    pub fn reader(&self) -> SharedPollStats {
        Arc::clone(&self.mailbox)
    }

    /// Record one tick's work cost and maybe publish.
    pub fn record(&mut self, now_secs: f64, work_us: f64) {
        self.ema_loop_us = if self.ema_loop_us == 0.0 {
            work_us
        } else {
            (1.0 - LOOP_EMA_ALPHA) * self.ema_loop_us + LOOP_EMA_ALPHA * work_us
        };
        self.window_ticks += 1;

        let elapsed = now_secs - self.window_start;
        if elapsed >= RATE_WINDOW_SECS {
            let stats = PollStats {
                effective_hz: self.window_ticks as f64 / elapsed,
                avg_loop_us: self.ema_loop_us,
            };
            self.mailbox.write(stats);
            self.window_start = now_secs;
            self.window_ticks = 0;
        }
    }

    /// Current EMA of per-tick work cost, microseconds.
    #[must_use]
    pub fn avg_loop_us(&self) -> f64 {
        self.ema_loop_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeds_with_first_sample() {
        let mut stats = LoopStats::new(0.0);
        stats.record(0.001, 40.0);
        assert!((stats.avg_loop_us() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_ema_smooths() {
        let mut stats = LoopStats::new(0.0);
        stats.record(0.001, 100.0);
        stats.record(0.002, 0.0);
        // 0.95 * 100 + 0.05 * 0 = 95
        assert!((stats.avg_loop_us() - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_publishes_after_window() {
        let mut stats = LoopStats::new(0.0);
        let reader = stats.reader();

        // 100 ticks over 0.1 s = 1000 Hz.
        for i in 1..=100 {
            stats.record(i as f64 * 1e-3, 50.0);
        }
        let snap = reader.read();
        assert!((snap.effective_hz - 1000.0).abs() < 1.0);
        assert!(snap.avg_loop_us > 0.0);
    }

    #[test]
    fn test_no_publish_before_window() {
        let mut stats = LoopStats::new(0.0);
        let reader = stats.reader();
        stats.record(0.001, 50.0);
        assert_eq!(reader.read(), PollStats::default());
    }
}
