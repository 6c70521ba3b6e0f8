use core::{
    pin::Pin,
    task::{Context, Poll},
};
use futures::{Stream, StreamExt, ready, stream::FusedStream};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    FilterScope, FilterSpec, FilterStrategy, FilterV1, IndexStream, JobSpec, RangeIterator,
    Result, TileIndex, TileRef, TileSource, Zoom,
};

/// Streams the tile indices a job has to (re)generate.
///
/// Entries of [`JobSpec::tiles`] are walked in the order given: a bare index
/// yields itself and a range is expanded lazily and exhausted before the next
/// entry starts. Entries are never merged or re-sorted against each other.
///
/// Without filters the store and generator are never consulted. With filters,
/// each entry is narrowed through the [`FilterStrategy`] (by default
/// [`FilterV1`]), which queries the sources as the entry is reached.
///
/// A failure is returned from the pull that triggered it and ends the stream;
/// indices already yielded stay yielded. Build a new iterator to retry.
#[must_use = "streams do nothing unless polled"]
pub struct JobIterator<'a, F = FilterV1> {
    zoom: Zoom,
    tiles: core::slice::Iter<'a, TileRef>,
    filters: &'a [FilterSpec],
    store: &'a dyn TileSource,
    generator: &'a dyn TileSource,
    strategy: F,
    current: Option<IndexStream<'a>>,
    failed: bool,
}

impl<'a> JobIterator<'a> {
    /// Creates an iterator applying filters with [`FilterV1`].
    ///
    /// # Errors
    ///
    /// See [`JobIterator::with_strategy`].
    pub fn new(
        spec: &'a JobSpec,
        store: &'a dyn TileSource,
        generator: &'a dyn TileSource,
    ) -> Result<Self> {
        Self::with_strategy(spec, store, generator, FilterV1)
    }
}

impl<'a, F> JobIterator<'a, F>
where
    F: FilterStrategy,
{
    /// Creates an iterator applying filters with `strategy`.
    ///
    /// No source is touched here; `spec` and its filters are only
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns the error from [`JobSpec::validate`] or
    /// [`FilterStrategy::check`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(zoom = spec.zoom, entries = spec.tiles.len()))
    )]
    pub fn with_strategy(
        spec: &'a JobSpec,
        store: &'a dyn TileSource,
        generator: &'a dyn TileSource,
        strategy: F,
    ) -> Result<Self> {
        spec.validate()?;
        let filters = spec.filters();
        for filter in filters {
            strategy.check(filter, spec.zoom)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(filters = filters.len(), "job iterator ready");

        Ok(Self {
            zoom: spec.zoom,
            tiles: spec.tiles.iter(),
            filters,
            store,
            generator,
            strategy,
            current: None,
            failed: false,
        })
    }

    /// Number of entries not started yet.
    pub fn remaining_entries(&self) -> usize {
        self.tiles.len()
    }

    fn open(&self, tile: &TileRef) -> Result<IndexStream<'a>> {
        let bounds = tile.range();

        #[cfg(feature = "tracing")]
        tracing::trace!(%bounds, "expanding entry");

        let mut stream: IndexStream<'a> = RangeIterator::from(bounds).map(Ok).boxed();
        if self.filters.is_empty() {
            return Ok(stream);
        }

        let scope = FilterScope {
            zoom: self.zoom,
            bounds,
            store: self.store,
            generator: self.generator,
        };
        for filter in self.filters {
            stream = self.strategy.apply(stream, filter, scope)?;
        }
        Ok(stream)
    }

    fn fail(&mut self) {
        self.failed = true;
        self.current = None;
    }
}

impl<F> Stream for JobIterator<'_, F>
where
    F: FilterStrategy + Unpin,
{
    type Item = Result<TileIndex>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.failed {
                return Poll::Ready(None);
            }

            if let Some(current) = this.current.as_mut() {
                match ready!(current.poll_next_unpin(cx)) {
                    Some(Ok(idx)) => return Poll::Ready(Some(Ok(idx))),
                    Some(Err(err)) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(%err, "job iteration failed");
                        this.fail();
                        return Poll::Ready(Some(Err(err)));
                    }
                    None => this.current = None,
                }
            }

            let Some(tile) = this.tiles.next() else {
                return Poll::Ready(None);
            };
            match this.open(tile) {
                Ok(stream) => this.current = Some(stream),
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%err, "failed to open job entry");
                    this.fail();
                    return Poll::Ready(Some(Err(err)));
                }
            }
        }
    }
}

impl<F> FusedStream for JobIterator<'_, F>
where
    F: FilterStrategy + Unpin,
{
    fn is_terminated(&self) -> bool {
        self.failed || (self.current.is_none() && self.tiles.len() == 0)
    }
}
