//! Insert, delete and find throughput, with ordered and random keys.
//!
//! Run with: cargo bench
//!
//! Delete and find run against a list pre-filled with `PREFILL` values.

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_skiplist::SkipList;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const BATCH: usize = 10_000;
const PREFILL: u64 = 1_000_000;

fn make_list() -> SkipList<u64, SmallRng> {
    SkipList::with_rng(SmallRng::seed_from_u64(12345))
}

fn random_keys(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random()).collect()
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(BATCH as u64));

    group.bench_function("ordered", |b| {
        let mut list = make_list();
        b.iter(|| {
            for i in 0..BATCH as u64 {
                black_box(list.insert(i));
            }
            list.clear();
        });
    });

    let keys = random_keys(BATCH, 1);
    group.bench_function("random", |b| {
        let mut list = make_list();
        b.iter(|| {
            for key in &keys {
                black_box(list.insert(*key));
            }
            list.clear();
        });
    });

    group.finish();
}

// ============================================================================
// Delete Benchmarks
// ============================================================================

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    group.throughput(Throughput::Elements(BATCH as u64));

    group.bench_function("ordered", |b| {
        b.iter_batched_ref(
            || {
                let mut list = make_list();
                list.extend(0..PREFILL);
                list
            },
            |list| {
                for i in 0..BATCH as u64 {
                    black_box(list.delete(&i));
                }
            },
            BatchSize::LargeInput,
        );
    });

    let prefill = random_keys(PREFILL as usize, 2);
    let probes = random_keys(BATCH, 3);
    group.bench_function("random", |b| {
        b.iter_batched_ref(
            || {
                let mut list = make_list();
                list.extend(prefill.iter().copied());
                list
            },
            |list| {
                for key in &probes {
                    black_box(list.delete(key));
                }
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ============================================================================
// Find Benchmarks
// ============================================================================

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");
    group.throughput(Throughput::Elements(BATCH as u64));

    let mut ordered = make_list();
    ordered.extend(0..PREFILL);
    group.bench_function("ordered", |b| {
        b.iter(|| {
            for i in 0..BATCH as u64 {
                black_box(ordered.find(&i));
            }
        });
    });

    let mut random = make_list();
    random.extend(random_keys(PREFILL as usize, 2));
    let probes = random_keys(BATCH, 3);
    group.bench_function("random", |b| {
        b.iter(|| {
            for key in &probes {
                black_box(random.find(key));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_delete, bench_find);
criterion_main!(benches);
