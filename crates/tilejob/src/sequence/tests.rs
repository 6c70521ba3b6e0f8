use core::convert::Infallible;

use futures::{Stream, StreamExt, TryStream, TryStreamExt, stream};

use crate::{
    ComplementIterator, DescendantIterator, IntersectIterator, MAX_ZOOM, RangeCompactor,
    RangeIterator, TileIndex, TileRange, TileStreamExt, index_count,
};

fn source(values: &[TileIndex]) -> impl Stream<Item = Result<TileIndex, Infallible>> + Unpin + '_ {
    stream::iter(values.iter().copied().map(Ok))
}

// Same values, but every element is preceded by a `Pending` poll.
fn yielding_source(
    values: &[TileIndex],
) -> impl Stream<Item = Result<TileIndex, Infallible>> + '_ {
    stream::iter(values.iter().copied()).then(|v| async move {
        tokio::task::yield_now().await;
        Ok(v)
    })
}

async fn collect<S>(stream: S) -> Vec<S::Ok>
where
    S: TryStream<Error = Infallible>,
{
    match stream.try_collect().await {
        Ok(values) => values,
        Err(never) => match never {},
    }
}

fn ranges(pairs: &[(TileIndex, TileIndex)]) -> Vec<TileRange> {
    pairs.iter().map(|&(from, before)| TileRange::new(from, before)).collect()
}

#[tokio::test]
async fn range_yields_half_open_bound() {
    let cases: &[(&str, TileIndex, TileIndex, &[TileIndex])] = &[
        ("a1", 0, 0, &[]),
        ("a2", 0, 1, &[0]),
        ("a3", 10, 14, &[10, 11, 12, 13]),
        ("reversed", 14, 10, &[]),
    ];
    for &(name, from, before, expected) in cases {
        let values: Vec<_> = RangeIterator::new(from, before).collect().await;
        assert_eq!(values, expected, "{name}");
    }
}

#[tokio::test]
async fn range_reports_exact_size() {
    let mut iter = RangeIterator::new(3, 7);
    assert_eq!(iter.size_hint(), (4, Some(4)));
    assert_eq!(iter.next().await, Some(3));
    assert_eq!(iter.remaining(), 3);
    assert_eq!(RangeIterator::new(7, 3).size_hint(), (0, Some(0)));
}

#[tokio::test]
async fn complement_reference_table() {
    let cases: &[(&str, &[TileIndex], TileIndex, TileIndex, &[TileIndex])] = &[
        ("b01", &[], 0, 0, &[]),
        ("b02", &[], 0, 1, &[0]),
        ("b03", &[], 0, 2, &[0, 1]),
        ("b04", &[0], 0, 1, &[]),
        ("b05", &[0], 0, 2, &[1]),
        ("b06", &[1], 0, 2, &[0]),
        ("b07", &[0, 1], 0, 2, &[]),
        ("b08", &[1], 0, 3, &[0, 2]),
        ("b09", &[2], 0, 3, &[0, 1]),
        ("b10", &[2], 0, 5, &[0, 1, 3, 4]),
        ("b11", &[0, 1], 0, 3, &[2]),
        ("b12", &[1, 2], 0, 3, &[0]),
        ("b13", &[1, 2], 0, 4, &[0, 3]),
        ("b14", &[0, 2], 1, 2, &[1]),
        ("b15", &[0, 3], 1, 3, &[1, 2]),
        ("b16", &[0, 2, 4], 1, 3, &[1]),
        ("b17", &[0, 2, 4], 1, 1, &[]),
        ("b18", &[0, 1, 4, 5], 1, 4, &[2, 3]),
        ("b19", &[0, 1, 4, 5], 2, 4, &[2, 3]),
        ("b20", &[0, 1, 4, 5], 1, 3, &[2]),
        ("b21", &[0, 1, 4, 5], 2, 3, &[2]),
    ];
    for &(name, values, from, before, expected) in cases {
        let out = collect(ComplementIterator::new(source(values), from, before)).await;
        assert_eq!(out, expected, "{name}");

        let out = collect(yielding_source(values).complement(from, before)).await;
        assert_eq!(out, expected, "{name} with pending source");
    }
}

#[tokio::test]
async fn complement_and_source_partition_the_bound() {
    let sets: &[&[TileIndex]] = &[&[], &[3], &[0, 9], &[1, 2, 3, 8], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]];
    for values in sets {
        for (from, before) in [(0, 10), (2, 7), (5, 5), (9, 12)] {
            let out = collect(source(values).complement(from, before)).await;
            let present = values.iter().filter(|v| (from..before).contains(*v)).count();
            assert_eq!(out.len() + present, (before - from) as usize);
            assert!(out.iter().all(|v| !values.contains(v)));
            assert!(out.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[tokio::test]
async fn complement_of_covering_source_is_empty() {
    for (from, before) in [(0, 0), (0, 1), (3, 17), (100, 164)] {
        let covering = RangeIterator::new(from, before).map(Ok::<_, Infallible>);
        let runs = collect(covering.complement(from, before).compact()).await;
        assert!(runs.is_empty(), "[{from}, {before})");
    }
}

#[tokio::test]
async fn complement_stops_polling_exhausted_source() {
    let mut values = vec![1u64].into_iter();
    let mut ended = false;
    let src = stream::poll_fn(move |_| {
        assert!(!ended, "source polled after exhaustion");
        let next = values.next();
        ended = next.is_none();
        core::task::Poll::Ready(next.map(Ok::<_, Infallible>))
    });
    assert_eq!(collect(src.complement(0, 6)).await, [0, 2, 3, 4, 5]);
}

#[tokio::test]
async fn complement_propagates_source_errors() {
    let src = stream::iter([Ok(1), Err("query failed"), Ok(3)]);
    let mut out = ComplementIterator::new(src, 0, 5);
    assert_eq!(out.next().await, Some(Ok(0)));
    assert_eq!(out.next().await, Some(Err("query failed")));
}

#[tokio::test]
async fn complement_is_lazy_over_huge_bounds() {
    let before = index_count(MAX_ZOOM);
    let present = [0, 5, before - 2];
    let head: Vec<_> = source(&present)
        .complement(0, before)
        .take(5)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(head, [1, 2, 3, 4, 6]);

    let tail = collect(source(&present).complement(before - 4, before)).await;
    assert_eq!(tail, [before - 4, before - 3, before - 1]);
}

#[tokio::test]
async fn compactor_reference_table() {
    let cases: &[(&str, &[TileIndex], &[(TileIndex, TileIndex)])] = &[
        ("d1", &[], &[]),
        ("d2", &[0], &[(0, 1)]),
        ("d3", &[1, 2], &[(1, 3)]),
        ("d4", &[1, 3], &[(1, 2), (3, 4)]),
        ("d5", &[1, 2, 4], &[(1, 3), (4, 5)]),
        ("d6", &[1, 3, 4], &[(1, 2), (3, 5)]),
        ("d7", &[1, 2, 4, 5, 7], &[(1, 3), (4, 6), (7, 8)]),
    ];
    for &(name, values, expected) in cases {
        let out = collect(RangeCompactor::new(source(values))).await;
        assert_eq!(out, ranges(expected), "{name}");

        let out = collect(yielding_source(values).compact()).await;
        assert_eq!(out, ranges(expected), "{name} with pending source");
    }
}

#[tokio::test]
async fn compacted_runs_expand_back_to_input() {
    let inputs: &[&[TileIndex]] = &[&[], &[7], &[0, 1, 2], &[2, 4, 6, 7, 8, 20, 21, 99]];
    for values in inputs {
        let runs = collect(source(values).compact()).await;
        assert!(runs.windows(2).all(|w| w[0].before < w[1].from), "runs touch");

        let mut expanded = Vec::new();
        for run in runs {
            expanded.extend(RangeIterator::from(run).collect::<Vec<_>>().await);
        }
        assert_eq!(expanded, *values);
    }
}

#[tokio::test]
async fn compactor_handles_the_top_of_the_index_space() {
    let top = u64::MAX;
    let out = collect(source(&[top - 5, top - 3, top - 2, top - 1]).compact()).await;
    assert_eq!(out, ranges(&[(top - 5, top - 4), (top - 3, top)]));

    // Out of domain: the run end saturates instead of overflowing.
    let out = collect(source(&[top - 1, top]).compact()).await;
    assert_eq!(out, ranges(&[(top - 1, top)]));
}

#[tokio::test]
async fn compactor_flushes_before_error() {
    let src = stream::iter([Ok(1), Ok(2), Ok(5), Err("boom")]);
    let mut out = RangeCompactor::new(src);
    assert_eq!(out.next().await, Some(Ok(TileRange::new(1, 3))));
    assert_eq!(out.next().await, Some(Err("boom")));
}

#[tokio::test]
async fn intersect_keeps_common_indices() {
    let cases: &[(&[TileIndex], &[TileIndex], &[TileIndex])] = &[
        (&[], &[1, 2], &[]),
        (&[1, 2], &[], &[]),
        (&[1, 3, 5, 7], &[2, 3, 4, 7, 9], &[3, 7]),
        (&[0, 1, 2, 3], &[0, 1, 2, 3], &[0, 1, 2, 3]),
    ];
    for &(left, right, expected) in cases {
        let out = collect(IntersectIterator::new(source(left), source(right))).await;
        assert_eq!(out, expected);

        let out = collect(yielding_source(left).intersect(yielding_source(right))).await;
        assert_eq!(out, expected);
    }
}

#[tokio::test]
async fn descendants_are_clipped_to_bounds() {
    // Zoom 1 index 1 covers zoom 2 indices 4..8.
    let out = collect(DescendantIterator::new(source(&[1]), 1, TileRange::new(0, 6))).await;
    assert_eq!(out, [4, 5]);

    let out = collect(source(&[0, 2, 3]).descendants(1, TileRange::new(2, 13))).await;
    assert_eq!(out, [2, 3, 8, 9, 10, 11, 12]);

    let out = collect(source(&[1, 4, 9]).descendants(0, TileRange::new(2, 9))).await;
    assert_eq!(out, [4]);

    let out = collect(source(&[0, 1]).descendants(2, TileRange::new(5, 5))).await;
    assert!(out.is_empty());
}
