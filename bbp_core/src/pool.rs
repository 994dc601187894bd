use tracing::trace;

use crate::bucket::Bucket;
use crate::buffer::{BufferKind, PooledBuffer};

/// Default minimum pooled size (requests at or below this are never pooled)
pub const DEFAULT_MIN_SIZE: usize = 0;
/// Default size-class increment
pub const DEFAULT_INCREMENT: usize = 1024;
/// Default largest pooled capacity
pub const DEFAULT_MAX_SIZE: usize = 64 * 1024;

/// Configuration error raised at pool construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolConfigError {
    #[error("min_size {min_size} must be smaller than increment {increment}")]
    MinSizeTooLarge { min_size: usize, increment: usize },

    #[error("increment {increment} must be smaller than max_size {max_size}")]
    IncrementTooLarge { increment: usize, max_size: usize },

    #[error("increment {increment} must evenly divide max_size {max_size}")]
    IncrementNotADivisor { increment: usize, max_size: usize },
}

/// A size-classed pool of reusable byte buffers.
///
/// Requested sizes are rounded up to the next multiple of `increment`, and
/// each multiple up to `max_size` gets its own [`Bucket`] of released
/// buffers — one array of buckets per [`BufferKind`]. Acquire pops from the
/// matching bucket and only allocates on a miss; release clears the buffer
/// and pushes it back. Requests at or below `min_size` or above `max_size`
/// bypass pooling entirely and are allocated at exactly the requested size.
///
/// All operations are non-blocking and safe from any number of threads.
/// The bucket arrays are fixed at construction; the queues inside them are
/// the only mutable state. No reuse-order guarantee is made: a release
/// racing an acquire on the same bucket may be served in any order.
#[derive(Debug)]
pub struct ArrayBufferPool {
    min_size: usize,
    increment: usize,
    direct: Box<[Bucket]>,
    indirect: Box<[Bucket]>,
}

impl ArrayBufferPool {
    /// Create a pool with the default sizes (0, 1024, 64 KB).
    pub fn new() -> Self {
        Self::with_sizes(DEFAULT_MIN_SIZE, DEFAULT_INCREMENT, DEFAULT_MAX_SIZE)
            .expect("default pool sizes are valid")
    }

    /// Create a pool with explicit sizing.
    ///
    /// `min_size` is the largest request that stays unpooled, `increment`
    /// the spacing between size classes, and `max_size` the capacity of the
    /// largest class. `min_size` must be smaller than `increment`, and
    /// `increment` must be smaller than and evenly divide `max_size`.
    pub fn with_sizes(
        min_size: usize,
        increment: usize,
        max_size: usize,
    ) -> Result<Self, PoolConfigError> {
        if min_size >= increment {
            return Err(PoolConfigError::MinSizeTooLarge {
                min_size,
                increment,
            });
        }
        if increment >= max_size {
            return Err(PoolConfigError::IncrementTooLarge {
                increment,
                max_size,
            });
        }
        if max_size % increment != 0 {
            return Err(PoolConfigError::IncrementNotADivisor {
                increment,
                max_size,
            });
        }

        let class_count = max_size / increment;
        let buckets =
            |count: usize| -> Box<[Bucket]> { (1..=count).map(|i| Bucket::new(i * increment)).collect() };

        Ok(Self {
            min_size,
            increment,
            direct: buckets(class_count),
            indirect: buckets(class_count),
        })
    }

    /// Check out a buffer of capacity at least `size`.
    ///
    /// A pooled buffer is reused when the matching bucket has one; otherwise
    /// a fresh buffer is allocated. Pooled classes hand back the class
    /// capacity (a multiple of the increment, possibly larger than `size`);
    /// unpooled requests get exactly `size`. A reused buffer is logically
    /// empty but its bytes past the length are not zeroed.
    ///
    /// Never blocks and never fails.
    pub fn acquire(&self, size: usize, direct: bool) -> PooledBuffer {
        let kind = if direct {
            BufferKind::Direct
        } else {
            BufferKind::Indirect
        };
        let Some(bucket) = self.bucket_for(size, direct) else {
            trace!(size, ?kind, "unpooled size class, tight allocation");
            return PooledBuffer::allocate(size, kind);
        };
        match bucket.pop() {
            Some(buffer) => {
                trace!(size, capacity = buffer.capacity(), ?kind, "pool hit");
                buffer
            }
            None => {
                trace!(size, capacity = bucket.capacity(), ?kind, "pool miss");
                PooledBuffer::allocate(bucket.capacity(), kind)
            }
        }
    }

    /// Return a buffer to the pool for reuse.
    ///
    /// The buffer is cleared and pushed into the bucket matching its
    /// `(capacity, kind)`. Buffers outside the pooled classes — capacity at
    /// or below `min_size`, above `max_size`, or not an exact class
    /// boundary — are silently dropped. Ownership always transfers here;
    /// the caller cannot retain or double-release a buffer.
    pub fn release(&self, mut buffer: PooledBuffer) {
        let capacity = buffer.capacity();
        let Some(bucket) = self.bucket_for(capacity, buffer.is_direct()) else {
            trace!(capacity, "released buffer has no bucket, dropping");
            return;
        };
        // A capacity strictly between two class boundaries maps to an index
        // but would poison the bucket's exact-capacity invariant. Drop it.
        if capacity != bucket.capacity() {
            trace!(
                capacity,
                class = bucket.capacity(),
                "released buffer off class boundary, dropping"
            );
            return;
        }
        buffer.clear();
        bucket.push(buffer);
    }

    /// Drop every pooled buffer in every bucket of both kinds.
    ///
    /// Buffers currently checked out are unaffected. The drain is not
    /// atomic across buckets: a release racing this call may land after
    /// its bucket was drained and be retained.
    pub fn clear(&self) {
        trace!("clearing all buckets");
        for bucket in self.direct.iter().chain(self.indirect.iter()) {
            bucket.drain();
        }
    }

    /// Read-only view of the bucket array for one buffer kind, in
    /// ascending capacity order. Diagnostic and test use only.
    pub fn buckets_for(&self, direct: bool) -> &[Bucket] {
        if direct {
            &self.direct
        } else {
            &self.indirect
        }
    }

    /// Map a size to its bucket: the smallest class with capacity >= size.
    /// None for unpooled sizes (at or below min_size, or past max_size).
    fn bucket_for(&self, size: usize, direct: bool) -> Option<&Bucket> {
        if size <= self.min_size {
            return None;
        }
        let index = (size - 1) / self.increment;
        self.buckets_for(direct).get(index)
    }
}

impl Default for ArrayBufferPool {
    fn default() -> Self {
        Self::new()
    }
}
