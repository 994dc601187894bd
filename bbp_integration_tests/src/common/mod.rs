//! Shared helpers for pool integration tests.

use bbp_core::ArrayBufferPool;

/// Pop every pooled buffer back out through the public acquire path and
/// check it against its bucket's declared capacity. Returns the number of
/// buffers that were pooled.
///
/// Only meaningful once all worker threads have joined.
pub fn drain_and_verify(pool: &ArrayBufferPool) -> usize {
    let mut drained = 0;
    for direct in [false, true] {
        for bucket in pool.buckets_for(direct) {
            let class = bucket.capacity();
            while !bucket.is_empty() {
                let buffer = pool.acquire(class, direct);
                assert_eq!(
                    buffer.capacity(),
                    class,
                    "bucket for class {class} held a mismatched buffer"
                );
                assert_eq!(buffer.is_direct(), direct);
                assert!(buffer.is_empty(), "pooled buffer was not cleared");
                drained += 1;
            }
        }
    }
    drained
}

/// Total number of buffers currently pooled across both kinds.
pub fn pooled_count(pool: &ArrayBufferPool) -> usize {
    [false, true]
        .into_iter()
        .flat_map(|direct| pool.buckets_for(direct))
        .map(bbp_core::Bucket::len)
        .sum()
}
