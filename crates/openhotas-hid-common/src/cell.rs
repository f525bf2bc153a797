//! Per-device latest-report cell.

use std::sync::Mutex;

/// Reports older than this are treated as absent.
pub const STALENESS_SECS: f64 = 0.5;

#[derive(Debug, Default, Clone)]
struct Slot {
    bytes: Vec<u8>,
    t: f64,
    valid: bool,
}

/// Last-writer-wins cell holding one device's most recent raw report.
///
/// A reader thread publishes each report as it arrives; the acquisition
/// thread takes the newest one per tick and discards anything stale. The
/// critical section is a buffer copy, short enough that a mutex beats the
/// complexity of a pointer-swap scheme here.
#[derive(Debug, Default)]
pub struct ReportCell {
    slot: Mutex<Slot>,
}

impl ReportCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a report with its arrival time.
    pub fn publish(&self, bytes: &[u8], t: f64) {
        let mut slot = self.lock();
        slot.bytes.clear();
        slot.bytes.extend_from_slice(bytes);
        slot.t = t;
        slot.valid = true;
    }

    /// Read the latest report if it is fresher than `staleness_secs`.
    #[must_use]
    pub fn read_fresh(&self, now: f64, staleness_secs: f64) -> Option<(Vec<u8>, f64)> {
        let slot = self.lock();
        if !slot.valid || slot.bytes.is_empty() {
            return None;
        }
        if now - slot.t > staleness_secs {
            return None;
        }
        Some((slot.bytes.clone(), slot.t))
    }

    /// Timestamp of the newest report, if any.
    #[must_use]
    pub fn latest_time(&self) -> Option<f64> {
        let slot = self.lock();
        slot.valid.then_some(slot.t)
    }

    /// Forget the stored report.
    pub fn invalidate(&self) {
        let mut slot = self.lock();
        slot.valid = false;
        slot.bytes.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
