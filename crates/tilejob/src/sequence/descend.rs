use core::{
    pin::Pin,
    task::{Context, Poll},
};
use futures::{Stream, TryStream, ready, stream::FusedStream};
use pin_project_lite::pin_project;

use crate::{TileIndex, TileRange, Zoom, index_count};

pin_project! {
    /// Maps an ascending stream of indices at some zoom to the ascending
    /// indices of their descendants `depth` levels deeper, clipped to
    /// `bounds`.
    ///
    /// With Morton indexing the descendants of `p` are the contiguous range
    /// `[p * 4^depth, (p + 1) * 4^depth)`, so only the current child range is
    /// held in memory. A `depth` of zero clips the source to `bounds`.
    #[must_use = "streams do nothing unless polled"]
    pub struct DescendantIterator<S> {
        #[pin]
        source: S,
        scale: u64,
        bounds: TileRange,
        children: TileRange,
        done: bool,
    }
}

impl<S> DescendantIterator<S>
where
    S: TryStream<Ok = TileIndex>,
{
    /// `depth` is expected to be a validated zoom difference.
    pub fn new(source: S, depth: Zoom, bounds: TileRange) -> Self {
        Self {
            source,
            scale: index_count(depth),
            bounds,
            children: TileRange::new(0, 0),
            done: bounds.is_empty(),
        }
    }
}

impl<S> Stream for DescendantIterator<S>
where
    S: TryStream<Ok = TileIndex>,
{
    type Item = Result<TileIndex, S::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if !this.children.is_empty() {
                let idx = this.children.from;
                this.children.from += 1;
                return Poll::Ready(Some(Ok(idx)));
            }
            if *this.done {
                return Poll::Ready(None);
            }

            match ready!(this.source.as_mut().try_poll_next(cx)) {
                Some(Ok(parent)) => {
                    let first = parent.saturating_mul(*this.scale);
                    if first >= this.bounds.before {
                        // Ascending source: nothing further can overlap.
                        *this.done = true;
                        continue;
                    }
                    let end = parent.saturating_add(1).saturating_mul(*this.scale);
                    *this.children = TileRange::new(
                        first.max(this.bounds.from),
                        end.min(this.bounds.before),
                    );
                }
                Some(Err(err)) => return Poll::Ready(Some(Err(err))),
                None => *this.done = true,
            }
        }
    }
}

impl<S> FusedStream for DescendantIterator<S>
where
    S: TryStream<Ok = TileIndex>,
{
    fn is_terminated(&self) -> bool {
        self.done && self.children.is_empty()
    }
}
