use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use treescan::*;

fn bench_reduce(c: &mut Criterion) {
    let pool = WorkerPool::new(&EngineConfig::with_workers(4)).unwrap();
    let mut source = ValueSource::from_seed(7);

    let mut group = c.benchmark_group("reduce_max");
    for exp in [10u32, 14, 18] {
        let len = 1usize << exp;
        let values = source.sequence(len, 0i64, 999);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("sequential", len), &values, |b, v| {
            b.iter(|| {
                let result = sequential::reduce(black_box(v), MaxOp);
                black_box(result)
            });
        });
        for strategy in [
            ReduceStrategy::Flat,
            ReduceStrategy::Tree,
            ReduceStrategy::SectionsBlock,
        ] {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), len),
                &values,
                |b, v| {
                    b.iter(|| {
                        let result = reduce(&pool, black_box(v), MaxOp, strategy);
                        black_box(result)
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let pool = WorkerPool::new(&EngineConfig::with_workers(4)).unwrap();
    let mut source = ValueSource::from_seed(8);

    let mut group = c.benchmark_group("prefix_sum");
    for exp in [10u32, 14, 18] {
        let len = 1usize << exp;
        let values = source.sequence(len, 1i64, 100);
        group.throughput(Throughput::Elements(len as u64));

        for strategy in [
            ScanStrategy::Sequential,
            ScanStrategy::Blelloch,
            ScanStrategy::BlockDecomposition,
        ] {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), len),
                &values,
                |b, v| {
                    b.iter(|| {
                        let result = prefix_scan(&pool, black_box(v), SumOp, strategy);
                        black_box(result)
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_worker_scaling(c: &mut Criterion) {
    let mut source = ValueSource::from_seed(9);
    let values = source.sequence(1 << 18, 1i64, 100);

    let mut group = c.benchmark_group("blelloch_workers");
    group.throughput(Throughput::Elements(values.len() as u64));
    for workers in [1usize, 2, 4, 8] {
        let pool = WorkerPool::new(&EngineConfig::with_workers(workers)).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            &values,
            |b, v| {
                b.iter(|| {
                    let result = blelloch::scan(&pool, black_box(v), SumOp);
                    black_box(result)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_reduce, bench_scan, bench_worker_scaling);
criterion_main!(benches);
