use broadcast_cell::{BroadcastCell, SyncStrategy, WriteKey};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

struct BenchKey;
unsafe impl WriteKey for BenchKey {}

fn snapshot_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    for size in [16usize, 1024, 65536] {
        let cell: BroadcastCell<BenchKey, Vec<u64>> = BroadcastCell::new(vec![7; size]);
        group.throughput(Throughput::Bytes((size * 8) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(cell.snapshot()))
        });
    }
    group.finish();
}

fn update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for size in [16usize, 1024, 65536] {
        let cell: BroadcastCell<BenchKey, Vec<u64>> = BroadcastCell::new(vec![0; size]);
        let mut key = BenchKey;
        group.throughput(Throughput::Bytes((size * 8) as u64));
        group.bench_with_input(BenchmarkId::new("copy", size), &size, |b, _| {
            b.iter(|| {
                cell.update_with(&mut key, SyncStrategy::Copy, |v| {
                    v[0] = v[0].wrapping_add(1);
                    true
                })
            })
        });
        group.bench_with_input(BenchmarkId::new("replay", size), &size, |b, _| {
            b.iter(|| {
                cell.update_with(&mut key, SyncStrategy::Replay, |v| {
                    v[0] = v[0].wrapping_add(1);
                    true
                })
            })
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = snapshot_benchmark, update_benchmark
);
criterion_main!(benches);
