use core::{
    cmp::Ordering,
    pin::Pin,
    task::{Context, Poll},
};
use futures::{Stream, TryStream, ready, stream::FusedStream};
use pin_project_lite::pin_project;

use crate::TileIndex;

pin_project! {
    /// Yields the indices produced by both ascending sources, in ascending
    /// order.
    ///
    /// Each side keeps one look-ahead slot and the sources are pulled one at a
    /// time. The stream ends as soon as either source is exhausted; the other
    /// one is left undrained.
    #[must_use = "streams do nothing unless polled"]
    pub struct IntersectIterator<A, B> {
        #[pin]
        left: A,
        #[pin]
        right: B,
        left_head: Option<TileIndex>,
        right_head: Option<TileIndex>,
        done: bool,
    }
}

impl<A, B> IntersectIterator<A, B>
where
    A: TryStream<Ok = TileIndex>,
    B: TryStream<Ok = TileIndex, Error = A::Error>,
{
    pub fn new(left: A, right: B) -> Self {
        Self {
            left,
            right,
            left_head: None,
            right_head: None,
            done: false,
        }
    }
}

impl<A, B> Stream for IntersectIterator<A, B>
where
    A: TryStream<Ok = TileIndex>,
    B: TryStream<Ok = TileIndex, Error = A::Error>,
{
    type Item = Result<TileIndex, A::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }

            let left = match *this.left_head {
                Some(value) => value,
                None => match ready!(this.left.as_mut().try_poll_next(cx)) {
                    Some(Ok(value)) => *this.left_head.insert(value),
                    Some(Err(err)) => return Poll::Ready(Some(Err(err))),
                    None => {
                        *this.done = true;
                        continue;
                    }
                },
            };

            let right = match *this.right_head {
                Some(value) => value,
                None => match ready!(this.right.as_mut().try_poll_next(cx)) {
                    Some(Ok(value)) => *this.right_head.insert(value),
                    Some(Err(err)) => return Poll::Ready(Some(Err(err))),
                    None => {
                        *this.done = true;
                        continue;
                    }
                },
            };

            match left.cmp(&right) {
                Ordering::Less => *this.left_head = None,
                Ordering::Greater => *this.right_head = None,
                Ordering::Equal => {
                    *this.left_head = None;
                    *this.right_head = None;
                    return Poll::Ready(Some(Ok(left)));
                }
            }
        }
    }
}

impl<A, B> FusedStream for IntersectIterator<A, B>
where
    A: TryStream<Ok = TileIndex>,
    B: TryStream<Ok = TileIndex, Error = A::Error>,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}
