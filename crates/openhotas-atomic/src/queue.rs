//! Bounded event queue for RT-to-consumer reporting.
//!
//! The acquisition thread pushes small `Copy` events (tick faults, dropped
//! updates) without blocking; a non-RT consumer drains them for logging and
//! status display. The queue is bounded and drops on overflow: losing a fault
//! event under a burst is acceptable, the subsystem status still reflects the
//! degradation.

use crossbeam::queue::ArrayQueue;

/// Default capacity for event queues.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Bounded, lock-free queue from the RT path to slow-path consumers.
///
/// # RT Safety
///
/// `push` is non-blocking and O(1); a full queue drops the event. `pop` is
/// intended for non-RT drain loops.
#[derive(Debug)]
pub struct EventQueue<T> {
    inner: ArrayQueue<T>,
}

impl<T> EventQueue<T> {
    /// Create a queue with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a queue with a specific capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: ArrayQueue::new(capacity),
        }
    }

    /// Enqueue an event, dropping it when the queue is full.
    ///
    /// Returns `true` if the event was accepted.
    #[inline]
    pub fn push(&self, event: T) -> bool {
        self.inner.push(event).is_ok()
    }

    /// Dequeue the next event, if any.
    #[inline]
    #[must_use]
    pub fn pop(&self) -> Option<T> {
        self.inner.pop()
    }

    /// Drain everything currently queued into a vector.
    ///
    /// Allocates; consumer side only.
    #[must_use]
    pub fn drain(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.inner.len());
        while let Some(event) = self.inner.pop() {
            out.push(event);
        }
        out
    }

    /// Number of queued events.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the queue is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
