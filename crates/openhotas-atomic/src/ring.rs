//! Single-writer sample ring with windowed snapshot reads.
//!
//! The acquisition thread owns the write end of every ring; any number of
//! reader threads may snapshot concurrently. The writer is wait-free: a
//! relaxed fetch-add on the write index followed by a plain slot store.
//! Readers accept that slots near the tail may be torn if the writer wraps
//! through them mid-copy; consumers of this crate (plot panels, filters)
//! tolerate an occasional duplicated or skipped edge in exchange for a
//! zero-cost hot path.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, Ordering};

/// One timestamped sample.
///
/// `t` is monotonic seconds since process start; `v` is the logical value in
/// the signal's canonical range.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Monotonic timestamp in seconds.
    pub t: f64,
    /// Logical value.
    pub v: f32,
}

impl Sample {
    /// Create a new sample.
    #[must_use]
    pub const fn new(t: f64, v: f32) -> Self {
        Self { t, v }
    }
}

/// Fixed-capacity power-of-two ring of samples.
///
/// # RT Safety
///
/// [`SampleRing::push`] is wait-free: one relaxed `fetch_add` plus one slot
/// store. Snapshot reads allocate and belong on the consumer side.
///
/// # Tearing
///
/// A reader that races the writer across a wrap may observe a slot mid-store.
/// Samples are 12 bytes, so the copy is not atomic. This is a deliberate
/// trade: snapshots are best-effort suffixes and every consumer re-reads on
/// the next frame.
#[derive(Debug)]
pub struct SampleRing {
    capacity: u64,
    mask: u64,
    data: Box<[UnsafeCell<Sample>]>,
    write_index: AtomicU64,
}

// Readers only copy out of slots; the single writer is the only mutator.
unsafe impl Sync for SampleRing {}
unsafe impl Send for SampleRing {}

impl SampleRing {
    /// Create a ring with the given power-of-two capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two or is less than 2.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        assert!(
            capacity.is_power_of_two() && capacity >= 2,
            "ring capacity must be a power of two >= 2, got {capacity}"
        );
        let data = (0..capacity)
            .map(|_| UnsafeCell::new(Sample::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            capacity,
            mask: capacity - 1,
            data,
            write_index: AtomicU64::new(0),
        }
    }

    /// Push a sample. Wait-free; never fails.
    ///
    /// Timestamps must be monotone non-decreasing across pushes; the
    /// acquisition clock guarantees this.
    #[inline]
    pub fn push(&self, t: f64, v: f32) {
        let idx = self.write_index.fetch_add(1, Ordering::Relaxed);
        // Single writer: no other thread stores to this slot.
        unsafe {
            *self.data[(idx & self.mask) as usize].get() = Sample { t, v };
        }
    }

    /// Total number of samples ever pushed.
    #[inline]
    #[must_use]
    pub fn total_pushed(&self) -> u64 {
        self.write_index.load(Ordering::Relaxed)
    }

    /// Number of samples currently retained (bounded by capacity).
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.write_index.load(Ordering::Acquire).min(self.capacity)
    }

    /// Whether any sample has been pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write_index.load(Ordering::Acquire) == 0
    }

    /// Ring capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Copy out every retained sample with `t >= latest_time - window_seconds`,
    /// in write order.
    ///
    /// `latest_time` is passed in by the caller (the writer publishes it
    /// separately) so the cutoff is computed once per snapshot.
    #[must_use]
    pub fn snapshot(&self, latest_time: f64, window_seconds: f64) -> Vec<Sample> {
        let mut out = Vec::new();
        self.snapshot_into(latest_time, window_seconds, &mut out);
        out
    }

    /// Snapshot into a caller-owned buffer, reusing its allocation.
    pub fn snapshot_into(&self, latest_time: f64, window_seconds: f64, out: &mut Vec<Sample>) {
        out.clear();
        let end = self.write_index.load(Ordering::Acquire);
        if end == 0 {
            return;
        }
        let start = end.saturating_sub(self.capacity);
        let cutoff = latest_time - window_seconds;
        for i in start..end {
            let s = unsafe { *self.data[(i & self.mask) as usize].get() };
            if s.t >= cutoff {
                out.push(s);
            }
        }
    }

    /// Like [`SampleRing::snapshot`], but prepends the most recent sample
    /// strictly before the cutoff, if one exists.
    ///
    /// If no sample falls inside the window but a baseline exists, the result
    /// is just the baseline, so step-plot consumers can reconstruct the
    /// stable level of an idle digital signal.
    #[must_use]
    pub fn snapshot_with_baseline(&self, latest_time: f64, window_seconds: f64) -> Vec<Sample> {
        let mut out = Vec::new();
        self.snapshot_with_baseline_into(latest_time, window_seconds, &mut out);
        out
    }

    /// Baseline variant of [`SampleRing::snapshot_into`].
    pub fn snapshot_with_baseline_into(
        &self,
        latest_time: f64,
        window_seconds: f64,
        out: &mut Vec<Sample>,
    ) {
        out.clear();
        let end = self.write_index.load(Ordering::Acquire);
        if end == 0 {
            return;
        }
        let start = end.saturating_sub(self.capacity);
        let cutoff = latest_time - window_seconds;
        let mut baseline: Option<Sample> = None;
        for i in start..end {
            let s = unsafe { *self.data[(i & self.mask) as usize].get() };
            if s.t < cutoff {
                baseline = Some(s);
                continue;
            }
            if out.is_empty() {
                if let Some(b) = baseline.take() {
                    out.push(b);
                }
            }
            out.push(s);
        }
        if out.is_empty() {
            if let Some(b) = baseline {
                out.push(b);
            }
        }
    }

    /// Reset the ring to empty.
    ///
    /// Not safe to call concurrently with the writer; callable only while
    /// acquisition is paused.
    pub fn clear(&self) {
        self.write_index.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_snapshot() {
        let ring = SampleRing::new(8);
        ring.push(0.0, 1.0);
        ring.push(0.001, 2.0);
        ring.push(0.002, 3.0);

        let snap = ring.snapshot(0.002, 10.0);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0], Sample::new(0.0, 1.0));
        assert_eq!(snap[2], Sample::new(0.002, 3.0));
    }

    #[test]
    fn test_empty_ring_snapshots_empty() {
        let ring = SampleRing::new(4);
        assert!(ring.is_empty());
        assert!(ring.snapshot(100.0, 10.0).is_empty());
        assert!(ring.snapshot_with_baseline(100.0, 10.0).is_empty());
    }

    #[test]
    fn test_window_cutoff() {
        let ring = SampleRing::new(16);
        for i in 0..10 {
            ring.push(i as f64, i as f32);
        }
        // Window of 3 s ending at t=9 keeps t in [6, 9].
        let snap = ring.snapshot(9.0, 3.0);
        assert_eq!(snap.len(), 4);
        assert_eq!(snap[0].t, 6.0);
    }

    #[test]
    fn test_wrap_retains_suffix() {
        let ring = SampleRing::new(4);
        for i in 0..10 {
            ring.push(i as f64, i as f32);
        }
        let snap = ring.snapshot(9.0, 1000.0);
        assert_eq!(snap.len(), 4);
        assert_eq!(snap[0].t, 6.0);
        assert_eq!(snap[3].t, 9.0);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.total_pushed(), 10);
    }

    #[test]
    fn test_baseline_prepended() {
        let ring = SampleRing::new(16);
        ring.push(0.0, 0.0);
        ring.push(1.0, 1.0);
        ring.push(5.0, 2.0);
        ring.push(6.0, 3.0);

        // Window [4, 6]: samples at 5 and 6 are inside, sample at 1 is the baseline.
        let snap = ring.snapshot_with_baseline(6.0, 2.0);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0], Sample::new(1.0, 1.0));
        assert_eq!(snap[1], Sample::new(5.0, 2.0));
    }

    #[test]
    fn test_baseline_only_when_window_empty() {
        let ring = SampleRing::new(16);
        ring.push(0.0, 0.0);
        ring.push(1.0, 1.0);

        // Window [99, 100] contains nothing; the most recent prior sample is kept.
        let snap = ring.snapshot_with_baseline(100.0, 1.0);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0], Sample::new(1.0, 1.0));
    }

    #[test]
    fn test_plain_snapshot_has_no_baseline() {
        let ring = SampleRing::new(16);
        ring.push(0.0, 0.0);
        ring.push(1.0, 1.0);
        assert!(ring.snapshot(100.0, 1.0).is_empty());
    }

    #[test]
    fn test_clear() {
        let ring = SampleRing::new(4);
        ring.push(0.0, 1.0);
        ring.clear();
        assert!(ring.is_empty());
        assert!(ring.snapshot(0.0, 10.0).is_empty());
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_non_pow2_capacity_panics() {
        let _ = SampleRing::new(6);
    }

    #[test]
    fn test_concurrent_reader_stays_bounded() {
        use std::sync::Arc;

        let ring = Arc::new(SampleRing::new(64));
        let writer = {
            let ring = Arc::clone(&ring);
            std::thread::spawn(move || {
                for i in 0..10_000u64 {
                    ring.push(i as f64 * 1e-3, (i % 7) as f32);
                }
            })
        };
        let reader = {
            let ring = Arc::clone(&ring);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let snap = ring.snapshot(1e9, 2e9);
                    assert!(snap.len() as u64 <= ring.capacity());
                }
            })
        };
        writer.join().expect("writer thread");
        reader.join().expect("reader thread");
    }
}
