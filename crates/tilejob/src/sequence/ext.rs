use futures::TryStream;

use crate::{
    ComplementIterator, DescendantIterator, IntersectIterator, RangeCompactor, TileIndex,
    TileRange, Zoom,
};

/// Adaptors for fallible, ascending tile index streams.
///
/// Implemented for every [`TryStream`] of [`TileIndex`].
pub trait TileStreamExt: TryStream<Ok = TileIndex> + Sized {
    /// Indices in `[from, before)` that `self` does not produce.
    fn complement(self, from: TileIndex, before: TileIndex) -> ComplementIterator<Self> {
        ComplementIterator::new(self, from, before)
    }

    /// Maximal contiguous runs of `self`.
    fn compact(self) -> RangeCompactor<Self> {
        RangeCompactor::new(self)
    }

    /// Indices produced by both `self` and `other`.
    fn intersect<B>(self, other: B) -> IntersectIterator<Self, B>
    where
        B: TryStream<Ok = TileIndex, Error = Self::Error>,
    {
        IntersectIterator::new(self, other)
    }

    /// Descendants of every index of `self`, `depth` levels deeper, clipped
    /// to `bounds`.
    fn descendants(self, depth: Zoom, bounds: TileRange) -> DescendantIterator<Self> {
        DescendantIterator::new(self, depth, bounds)
    }
}

impl<S> TileStreamExt for S where S: TryStream<Ok = TileIndex> {}
