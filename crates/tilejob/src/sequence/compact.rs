use core::{
    pin::Pin,
    task::{Context, Poll},
};
use futures::{Stream, TryStream, ready, stream::FusedStream};
use pin_project_lite::pin_project;

use crate::{TileIndex, TileRange};

pin_project! {
    /// Collapses an ascending, duplicate-free index stream into maximal
    /// half-open runs.
    ///
    /// Consecutive indices merge into a single [`TileRange`]; an isolated
    /// index `n` becomes `[n, n + 1)`. Two emitted ranges never touch.
    ///
    /// Indices must be below `u64::MAX`, whose run end is not representable.
    /// Tile indices never get there: the deepest zoom holds `4^26` tiles.
    #[must_use = "streams do nothing unless polled"]
    pub struct RangeCompactor<S> {
        #[pin]
        source: S,
        run: Option<TileRange>,
        done: bool,
    }
}

impl<S> RangeCompactor<S>
where
    S: TryStream<Ok = TileIndex>,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            run: None,
            done: false,
        }
    }
}

impl<S> Stream for RangeCompactor<S>
where
    S: TryStream<Ok = TileIndex>,
{
    type Item = Result<TileRange, S::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }
            match ready!(this.source.as_mut().try_poll_next(cx)) {
                Some(Ok(value)) => {
                    if let Some(run) = this.run.as_mut() {
                        if value == run.before {
                            run.before = value.saturating_add(1);
                            continue;
                        }
                        // Gap: flush the open run and start a new one.
                        let flushed = *run;
                        *run = TileRange::single(value);
                        return Poll::Ready(Some(Ok(flushed)));
                    }
                    *this.run = Some(TileRange::single(value));
                }
                Some(Err(err)) => return Poll::Ready(Some(Err(err))),
                None => {
                    *this.done = true;
                    return Poll::Ready(this.run.take().map(Ok));
                }
            }
        }
    }
}

impl<S> FusedStream for RangeCompactor<S>
where
    S: TryStream<Ok = TileIndex>,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}
