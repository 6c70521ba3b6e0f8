use core::{
    pin::Pin,
    task::{Context, Poll},
};
use futures::{Stream, TryStream, ready, stream::FusedStream};
use pin_project_lite::pin_project;

use crate::TileIndex;

pin_project! {
    /// Yields, in ascending order, every index in `[from, before)` that the
    /// ascending `source` does not produce.
    ///
    /// This is a linear merge over a single look-ahead slot. Source values
    /// outside the bound are tolerated: values behind the cursor are skipped
    /// and values past `before` simply never match. The bound is never
    /// enumerated up front, so it may span billions of indices.
    ///
    /// The source is not polled again once it reports exhaustion. A source
    /// error is returned from the pull that triggered it.
    #[must_use = "streams do nothing unless polled"]
    pub struct ComplementIterator<S> {
        #[pin]
        source: S,
        cursor: TileIndex,
        before: TileIndex,
        lookahead: Option<TileIndex>,
        exhausted: bool,
    }
}

impl<S> ComplementIterator<S>
where
    S: TryStream<Ok = TileIndex>,
{
    pub fn new(source: S, from: TileIndex, before: TileIndex) -> Self {
        Self {
            source,
            cursor: from,
            before,
            lookahead: None,
            exhausted: false,
        }
    }
}

impl<S> Stream for ComplementIterator<S>
where
    S: TryStream<Ok = TileIndex>,
{
    type Item = Result<TileIndex, S::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.cursor >= *this.before {
                return Poll::Ready(None);
            }

            if this.lookahead.is_none() && !*this.exhausted {
                loop {
                    match ready!(this.source.as_mut().try_poll_next(cx)) {
                        Some(Ok(value)) if value < *this.cursor => {}
                        Some(Ok(value)) => {
                            *this.lookahead = Some(value);
                            break;
                        }
                        Some(Err(err)) => return Poll::Ready(Some(Err(err))),
                        None => {
                            *this.exhausted = true;
                            break;
                        }
                    }
                }
            }

            let current = *this.cursor;
            *this.cursor += 1;
            if *this.lookahead == Some(current) {
                // Present in the source, so excluded.
                *this.lookahead = None;
                continue;
            }
            return Poll::Ready(Some(Ok(current)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.before.saturating_sub(self.cursor);
        (0, usize::try_from(remaining).ok())
    }
}

impl<S> FusedStream for ComplementIterator<S>
where
    S: TryStream<Ok = TileIndex>,
{
    fn is_terminated(&self) -> bool {
        self.cursor >= self.before
    }
}
