//! Fold-path benchmarks.
//!
//! Run with: `cargo bench --package pampero-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pampero_aggregate::fold_ticks;
use pampero_bench::{reversed, synthetic_ticks};

fn fold_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");

    for count in [1_000usize, 10_000, 100_000] {
        let ticks = synthetic_ticks(count, 42);
        let backwards = reversed(&ticks);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("in-order", count), &ticks, |b, batch| {
            b.iter(|| fold_ticks(batch));
        });
        group.bench_with_input(
            BenchmarkId::new("reversed", count),
            &backwards,
            |b, batch| {
                b.iter(|| fold_ticks(batch));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, fold_benchmark);
criterion_main!(benches);
