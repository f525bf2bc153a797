//! Per-signal sample storage and the snapshot API.

use crate::DEFAULT_RING_CAPACITY;
use openhotas_atomic::{AtomicF64, Sample, SampleRing};
use openhotas_signal_map::{SignalKey, SignalMap};
use std::collections::HashMap;

/// Bounds for the snapshot window length, seconds.
pub const WINDOW_RANGE_SECS: (f64, f64) = (1.0, 60.0);

struct SignalSlot {
    raw: SampleRing,
    filtered: SampleRing,
}

/// One raw ring and one filtered ring per signal, plus the published latest
/// time and the shared window length.
///
/// The acquisition thread owns the write ends; consumers snapshot through the
/// read API concurrently. `latest_time` advances every tick from the
/// monotonic clock even when no device data arrives, so an idle device never
/// looks like a frozen pipeline.
pub struct SignalStore {
    slots: Vec<SignalSlot>,
    index: HashMap<SignalKey, usize>,
    latest_time: AtomicF64,
    window_seconds: AtomicF64,
}

impl SignalStore {
    /// Build a store with one ring pair per descriptor in `map`.
    #[must_use]
    pub fn new(map: &SignalMap) -> Self {
        Self::with_capacity(map, DEFAULT_RING_CAPACITY)
    }

    /// Build with a custom ring capacity (power of two).
    ///
    /// Capacity is chosen so `capacity / target_hz` covers the maximum
    /// window; the default gives 1 kHz × 60 s plus headroom.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two >= 2.
    #[must_use]
    pub fn with_capacity(map: &SignalMap, capacity: u64) -> Self {
        let mut slots = Vec::with_capacity(map.len());
        let mut index = HashMap::with_capacity(map.len());
        for descriptor in map.descriptors() {
            index.insert(descriptor.key.clone(), slots.len());
            slots.push(SignalSlot {
                raw: SampleRing::new(capacity),
                filtered: SampleRing::new(capacity),
            });
        }
        Self {
            slots,
            index,
            latest_time: AtomicF64::new(0.0),
            window_seconds: AtomicF64::new(30.0),
        }
    }

    /// Dense index of a signal, if the store knows it.
    #[must_use]
    pub fn index_of(&self, key: &SignalKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Number of signals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store has no signals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write one raw sample. Acquisition thread only.
    #[inline]
    pub fn push_raw(&self, slot: usize, t: f64, v: f32) {
        self.slots[slot].raw.push(t, v);
    }

    /// Write one filtered sample. Acquisition thread only.
    #[inline]
    pub fn push_filtered(&self, slot: usize, t: f64, v: f32) {
        self.slots[slot].filtered.push(t, v);
    }

    /// Publish the tick timestamp. All samples already written this tick have
    /// `t <=` this value.
    #[inline]
    pub fn publish_latest(&self, t: f64) {
        self.latest_time.store(t);
    }

    /// The most recent published tick time.
    #[must_use]
    pub fn latest_time(&self) -> f64 {
        self.latest_time.load()
    }

    /// Set the snapshot window length, clamped to `[1, 60]` seconds.
    pub fn set_window_seconds(&self, seconds: f64) {
        let (lo, hi) = WINDOW_RANGE_SECS;
        self.window_seconds.store(seconds.clamp(lo, hi));
    }

    /// Current snapshot window length.
    #[must_use]
    pub fn window_seconds(&self) -> f64 {
        self.window_seconds.load()
    }

    /// Windowed snapshot of a signal's raw samples.
    #[must_use]
    pub fn snapshot_raw(&self, key: &SignalKey) -> Vec<Sample> {
        self.ring_of(key, false)
            .map(|ring| ring.snapshot(self.latest_time(), self.window_seconds()))
            .unwrap_or_default()
    }

    /// Windowed snapshot of a signal's filtered samples.
    #[must_use]
    pub fn snapshot_filtered(&self, key: &SignalKey) -> Vec<Sample> {
        self.ring_of(key, true)
            .map(|ring| ring.snapshot(self.latest_time(), self.window_seconds()))
            .unwrap_or_default()
    }

    /// Filtered snapshot with the pre-window baseline sample, for
    /// edge-reconstruction of digital step plots.
    #[must_use]
    pub fn snapshot_filtered_with_baseline(&self, key: &SignalKey) -> Vec<Sample> {
        self.ring_of(key, true)
            .map(|ring| ring.snapshot_with_baseline(self.latest_time(), self.window_seconds()))
            .unwrap_or_default()
    }

    /// Raw snapshot with the pre-window baseline sample.
    #[must_use]
    pub fn snapshot_raw_with_baseline(&self, key: &SignalKey) -> Vec<Sample> {
        self.ring_of(key, false)
            .map(|ring| ring.snapshot_with_baseline(self.latest_time(), self.window_seconds()))
            .unwrap_or_default()
    }

    /// Reset every ring and the published time.
    ///
    /// Callable only while acquisition is paused; ring clears are not
    /// concurrent-safe with the writer.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.raw.clear();
            slot.filtered.clear();
        }
        self.latest_time.store(0.0);
    }

    fn ring_of(&self, key: &SignalKey, filtered: bool) -> Option<&SampleRing> {
        let slot = &self.slots[*self.index.get(key)?];
        Some(if filtered { &slot.filtered } else { &slot.raw })
    }
}

impl std::fmt::Debug for SignalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalStore")
            .field("signals", &self.slots.len())
            .field("latest_time", &self.latest_time.load())
            .field("window_seconds", &self.window_seconds.load())
            .finish()
    }
}
