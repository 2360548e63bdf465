//! # Adaptive Bloom Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | `contains` on a settled filter | < 1µs |
//! | `add` including amortized resizes | < 5µs |
//! | rebuild of 100k keys | < 100ms |

use adaptive_bloom::{
    AdaptiveBloomFilter, AdaptiveConfigBuilder, FixedBloomFilter, HashAlgorithm, HashFamily,
    ResizeMode,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

fn keys(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("bench-key-{:08}", i).into_bytes()).collect()
}

fn bench_fixed_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed-filter");

    for algorithm in [HashAlgorithm::Polynomial, HashAlgorithm::Murmur3] {
        let hashes = Arc::new(HashFamily::with_default_seeds(3, algorithm).unwrap());
        let filter = FixedBloomFilter::try_new(1 << 20, hashes).unwrap();
        let keys = keys(10_000);
        for key in &keys {
            filter.add(key);
        }

        group.bench_function(BenchmarkId::new("contains", format!("{:?}", algorithm)), |b| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % keys.len();
                black_box(filter.contains(&keys[i]))
            })
        });
    }

    group.finish();
}

fn bench_adaptive_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive-add");
    group.measurement_time(Duration::from_secs(10));

    for size in [1_000usize, 10_000, 100_000] {
        let keys = keys(size);
        group.throughput(Throughput::Elements(size as u64));

        for mode in [ResizeMode::Inline, ResizeMode::Background] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), size),
                &keys,
                |b, keys| {
                    b.iter(|| {
                        let config = AdaptiveConfigBuilder::new()
                            .initial_capacity(64)
                            .resize_mode(mode)
                            .build()
                            .unwrap();
                        let filter = AdaptiveBloomFilter::new(config).unwrap();
                        for key in keys {
                            filter.add(key);
                        }
                        filter.wait_for_rebuild();
                        black_box(filter.current_capacity())
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_adaptive_contains(c: &mut Criterion) {
    let filter = AdaptiveBloomFilter::configure(64, 3, 0.5, 2.0).unwrap();
    let keys = keys(100_000);
    for key in &keys {
        filter.add(key);
    }
    filter.wait_for_rebuild();

    c.bench_function("adaptive-contains", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % keys.len();
            black_box(filter.contains(&keys[i]))
        })
    });
}

criterion_group!(
    benches,
    bench_fixed_filter,
    bench_adaptive_add,
    bench_adaptive_contains
);
criterion_main!(benches);
