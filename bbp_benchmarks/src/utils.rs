use bbp_core::ArrayBufferPool;

/// Warm every bucket of one kind with `per_class` released buffers so
/// benchmarks measure the hit path instead of cold allocation.
pub fn prefill(pool: &ArrayBufferPool, direct: bool, per_class: usize) {
    let classes: Vec<usize> = pool
        .buckets_for(direct)
        .iter()
        .map(|bucket| bucket.capacity())
        .collect();
    for class in classes {
        let buffers: Vec<_> = (0..per_class).map(|_| pool.acquire(class, direct)).collect();
        for buffer in buffers {
            pool.release(buffer);
        }
    }
}
