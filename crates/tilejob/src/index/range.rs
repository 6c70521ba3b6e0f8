use crate::TileIndex;

/// A half-open range of tile indices, `[from, before)`.
///
/// `before <= from` denotes the empty range. Emptiness is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[TileIndex; 2]", into = "[TileIndex; 2]"))]
pub struct TileRange {
    pub from: TileIndex,
    pub before: TileIndex,
}

impl TileRange {
    pub const fn new(from: TileIndex, before: TileIndex) -> Self {
        Self { from, before }
    }

    /// The single-tile range `[index, index + 1)`.
    ///
    /// `index` must be below `u64::MAX`; that value saturates to an empty
    /// range.
    pub const fn single(index: TileIndex) -> Self {
        Self::new(index, index.saturating_add(1))
    }

    pub const fn is_empty(&self) -> bool {
        self.before <= self.from
    }

    /// Number of indices in the range; zero when empty.
    pub const fn len(&self) -> u64 {
        self.before.saturating_sub(self.from)
    }

    pub const fn contains(&self, index: TileIndex) -> bool {
        self.from <= index && index < self.before
    }

    /// A synchronous iterator over the range.
    pub fn iter(&self) -> core::ops::Range<TileIndex> {
        self.from..self.before
    }
}

impl From<[TileIndex; 2]> for TileRange {
    fn from([from, before]: [TileIndex; 2]) -> Self {
        Self::new(from, before)
    }
}

impl From<TileRange> for [TileIndex; 2] {
    fn from(range: TileRange) -> Self {
        [range.from, range.before]
    }
}

impl core::fmt::Display for TileRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}, {})", self.from, self.before)
    }
}
