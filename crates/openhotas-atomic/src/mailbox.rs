//! Seqlock-style snapshot mailbox for `Copy` payloads.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU32, Ordering};

/// Lock-free, single-writer/multi-reader snapshot cell.
///
/// The writer bumps a sequence counter to odd, stores the payload, then
/// publishes an even sequence value. Readers retry while the sequence is odd
/// or changed underneath them, so a completed read is always a coherent
/// snapshot.
///
/// Used to publish POD stats values from the acquisition thread without a
/// lock on either side.
#[derive(Debug)]
pub struct StatsMailbox<T: Copy> {
    seq: AtomicU32,
    data: UnsafeCell<T>,
}

// Readers copy the payload and validate the sequence afterwards; the single
// writer is the only mutator.
unsafe impl<T: Copy> Sync for StatsMailbox<T> {}
unsafe impl<T: Copy + Send> Send for StatsMailbox<T> {}

impl<T: Copy> StatsMailbox<T> {
    /// Create a mailbox holding `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            seq: AtomicU32::new(0),
            data: UnsafeCell::new(value),
        }
    }

    /// Publish a new snapshot. Single writer only.
    pub fn write(&self, value: T) {
        let seq = self.seq.load(Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(1), Ordering::Release);
        unsafe {
            *self.data.get() = value;
        }
        self.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// Read the latest coherent snapshot.
    ///
    /// Spins only while the writer is mid-publish, which lasts a handful of
    /// instructions.
    #[must_use]
    pub fn read(&self) -> T {
        loop {
            let start = self.seq.load(Ordering::Acquire);
            if (start & 1) != 0 {
                std::hint::spin_loop();
                continue;
            }
            let value = unsafe { *self.data.get() };
            let end = self.seq.load(Ordering::Acquire);
            if start == end {
                return value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mb = StatsMailbox::new(0u64);
        assert_eq!(mb.read(), 0);
        mb.write(42);
        assert_eq!(mb.read(), 42);
    }

    #[test]
    fn test_concurrent_reads_are_coherent() {
        use std::sync::Arc;

        // Payload whose halves must always match.
        #[derive(Clone, Copy)]
        struct Pair(u64, u64);

        let mb = Arc::new(StatsMailbox::new(Pair(0, 0)));
        let writer = {
            let mb = Arc::clone(&mb);
            std::thread::spawn(move || {
                for i in 0..100_000u64 {
                    mb.write(Pair(i, i.wrapping_mul(3)));
                }
            })
        };
        let reader = {
            let mb = Arc::clone(&mb);
            std::thread::spawn(move || {
                for _ in 0..100_000 {
                    let Pair(a, b) = mb.read();
                    assert_eq!(b, a.wrapping_mul(3));
                }
            })
        };
        writer.join().expect("writer thread");
        reader.join().expect("reader thread");
    }
}
