use core::{convert::Infallible, hint::black_box};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use futures::{StreamExt, TryStreamExt, stream};
use tilejob::{
    FilterSpec, JobIterator, JobSpec, MemoryTileSource, RangeIterator, TileRange, TileRef,
    TileStreamExt,
};
use tokio::runtime::Builder;

// Indices pulled per benchmark iteration.
const TOTAL_INDICES: u64 = 1 << 16;

fn sparse(every: u64) -> impl Iterator<Item = u64> {
    (0..TOTAL_INDICES).step_by(every as usize)
}

/// Plain range expansion, the unfiltered job hot path.
fn bench_range(c: &mut Criterion) {
    let rt = Builder::new_current_thread().build().unwrap();
    let mut group = c.benchmark_group("range");
    group.throughput(Throughput::Elements(TOTAL_INDICES));

    group.bench_function(format!("elems/{TOTAL_INDICES}"), |b| {
        b.to_async(&rt).iter(|| async {
            let mut iter = RangeIterator::new(0, TOTAL_INDICES);
            while let Some(idx) = iter.next().await {
                black_box(idx);
            }
        });
    });

    group.finish();
}

/// Complement against sources of varying density.
fn bench_complement(c: &mut Criterion) {
    let rt = Builder::new_current_thread().build().unwrap();
    let mut group = c.benchmark_group("complement");
    group.throughput(Throughput::Elements(TOTAL_INDICES));

    for every in [1, 2, 64] {
        let present: Vec<u64> = sparse(every).collect();
        group.bench_function(format!("every_{every}/elems/{TOTAL_INDICES}"), |b| {
            b.to_async(&rt).iter(|| async {
                let source = stream::iter(present.iter().copied().map(Ok::<_, Infallible>));
                let mut gaps = source.complement(0, TOTAL_INDICES);
                while let Some(idx) = gaps.next().await {
                    black_box(idx.unwrap());
                }
            });
        });
    }

    group.finish();
}

fn bench_compact(c: &mut Criterion) {
    let rt = Builder::new_current_thread().build().unwrap();
    let mut group = c.benchmark_group("compact");
    group.throughput(Throughput::Elements(TOTAL_INDICES));

    let present: Vec<u64> = sparse(3).collect();
    group.bench_function(format!("elems/{TOTAL_INDICES}"), |b| {
        b.to_async(&rt).iter(|| async {
            let source = stream::iter(present.iter().copied().map(Ok::<_, Infallible>));
            let runs: Vec<TileRange> = source
                .complement(0, TOTAL_INDICES)
                .compact()
                .try_collect()
                .await
                .unwrap();
            black_box(runs);
        });
    });

    group.finish();
}

/// A filtered job checking existing data one zoom level up.
fn bench_filtered_job(c: &mut Criterion) {
    let rt = Builder::new_current_thread().build().unwrap();
    let mut group = c.benchmark_group("job");
    group.throughput(Throughput::Elements(TOTAL_INDICES));

    let spec = JobSpec::new(9, [TileRef::Range(TileRange::new(0, TOTAL_INDICES))])
        .with_filters([FilterSpec::new().at_zoom_offset(-1).missing()]);
    // Every other zoom-8 parent exists, so half of the candidates are missing.
    let store = MemoryTileSource::new().with_indices(8, sparse(8).map(|idx| idx / 4));
    let generator = MemoryTileSource::new();

    group.bench_function(format!("missing/elems/{TOTAL_INDICES}"), |b| {
        b.to_async(&rt).iter(|| async {
            let mut iter = JobIterator::new(&spec, &store, &generator).unwrap();
            while let Some(idx) = iter.next().await {
                black_box(idx.unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_range,
    bench_complement,
    bench_compact,
    bench_filtered_job
);
criterion_main!(benches);
