use std::fmt;

use crossbeam::queue::SegQueue;

use crate::buffer::PooledBuffer;

/// One size class of the pool: a fixed capacity plus a lock-free queue
/// of released buffers waiting for reuse.
///
/// Every buffer stored here has exactly this bucket's capacity; the pool's
/// release path enforces that before pushing. The queue is unbounded and
/// safe for concurrent push/pop from any number of threads, with no
/// ordering promise across racing producers and consumers.
pub struct Bucket {
    capacity: usize,
    queue: SegQueue<PooledBuffer>,
}

impl Bucket {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: SegQueue::new(),
        }
    }

    /// Exact capacity of every buffer this bucket serves
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffers currently pooled.
    ///
    /// Approximate under concurrent traffic; exact when the bucket is quiescent.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if no buffers are pooled right now
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Non-blocking pop; None on a pool miss.
    pub(crate) fn pop(&self) -> Option<PooledBuffer> {
        self.queue.pop()
    }

    pub(crate) fn push(&self, buffer: PooledBuffer) {
        self.queue.push(buffer);
    }

    /// Discard every pooled buffer. Safe to race with push/pop; a buffer
    /// pushed concurrently may survive the drain.
    pub(crate) fn drain(&self) {
        while self.queue.pop().is_some() {}
    }
}

impl fmt::Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("capacity", &self.capacity)
            .field("queued", &self.queue.len())
            .finish()
    }
}
