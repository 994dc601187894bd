use bbp_benchmarks::utils::prefill;
use bbp_core::ArrayBufferPool;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::thread;

/// Each iteration runs `threads` workers hammering the same bucket,
/// measuring how the lock-free queues behave under producer/consumer races.
fn contended_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    group.sample_size(20);

    for threads in [2usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("same_bucket", threads),
            &threads,
            |b, &threads| {
                let pool = Arc::new(ArrayBufferPool::new());
                prefill(&pool, false, threads);
                b.iter(|| {
                    let handles: Vec<_> = (0..threads)
                        .map(|_| {
                            let pool = Arc::clone(&pool);
                            thread::spawn(move || {
                                for _ in 0..1_000 {
                                    let buffer = pool.acquire(black_box(4096), false);
                                    pool.release(buffer);
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, contended_benchmark);
criterion_main!(benches);
