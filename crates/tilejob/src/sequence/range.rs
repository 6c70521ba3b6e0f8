use core::{
    pin::Pin,
    task::{Context, Poll},
};
use futures::{Stream, stream::FusedStream};

use crate::{TileIndex, TileRange};

/// Yields `from, from + 1, ..., before - 1`, then ends.
///
/// If `before <= from` the first pull ends the stream. The only state is a
/// single cursor, and the stream never fails. Wrap it with
/// [`StreamExt::map(Ok)`] to feed combinators that expect a fallible source.
///
/// [`StreamExt::map(Ok)`]: futures::StreamExt::map
#[derive(Debug, Clone)]
#[must_use = "streams do nothing unless polled"]
pub struct RangeIterator {
    next: TileIndex,
    before: TileIndex,
}

impl RangeIterator {
    pub const fn new(from: TileIndex, before: TileIndex) -> Self {
        Self { next: from, before }
    }

    /// Number of indices still to be yielded.
    pub const fn remaining(&self) -> u64 {
        self.before.saturating_sub(self.next)
    }
}

impl From<TileRange> for RangeIterator {
    fn from(range: TileRange) -> Self {
        Self::new(range.from, range.before)
    }
}

impl Stream for RangeIterator {
    type Item = TileIndex;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.next >= this.before {
            return Poll::Ready(None);
        }
        let idx = this.next;
        this.next += 1;
        Poll::Ready(Some(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedStream for RangeIterator {
    fn is_terminated(&self) -> bool {
        self.next >= self.before
    }
}
