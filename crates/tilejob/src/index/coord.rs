use crate::{Error, Result};

/// A linearized quad-tree cell at an implicit zoom level.
///
/// Indices are Morton (Z-order) encoded: bit `2i` holds bit `i` of `x` and bit
/// `2i + 1` holds bit `i` of `y`. As a consequence, the descendants of index
/// `p` that lie `d` levels deeper form the contiguous range
/// `[p * 4^d, (p + 1) * 4^d)`.
pub type TileIndex = u64;

/// A zoom level. Zoom `z` holds `4^z` tiles.
pub type Zoom = u8;

/// The deepest zoom level accepted by this crate.
pub const MAX_ZOOM: Zoom = 26;

/// Returns `zoom` unchanged if it lies within `0..=MAX_ZOOM`.
///
/// # Errors
///
/// Returns [`Error::InvalidZoom`] for deeper zoom levels.
pub fn validate_zoom(zoom: Zoom) -> Result<Zoom> {
    if zoom > MAX_ZOOM {
        return Err(Error::InvalidZoom { zoom });
    }
    Ok(zoom)
}

/// Number of tiles at `zoom`, i.e. `4^zoom`.
///
/// Callers are expected to pass a validated zoom; `zoom <= 31` never
/// overflows.
#[inline]
pub const fn index_count(zoom: Zoom) -> u64 {
    1 << (2 * zoom as u32)
}

/// Tile coordinates on the `2^zoom` by `2^zoom` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCoord {
    pub zoom: Zoom,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Creates validated tile coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZoom`] or [`Error::CoordOutOfRange`].
    pub fn new(zoom: Zoom, x: u32, y: u32) -> Result<Self> {
        validate_zoom(zoom)?;
        let side = 1u64 << zoom;
        if u64::from(x) >= side || u64::from(y) >= side {
            return Err(Error::CoordOutOfRange { x, y, zoom });
        }
        Ok(Self { zoom, x, y })
    }

    /// Decodes a Morton index at `zoom`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZoom`] or [`Error::IndexOutOfRange`].
    pub fn from_index(zoom: Zoom, index: TileIndex) -> Result<Self> {
        validate_zoom(zoom)?;
        if index >= index_count(zoom) {
            return Err(Error::IndexOutOfRange { index, zoom });
        }
        Ok(Self {
            zoom,
            x: compact_bits(index),
            y: compact_bits(index >> 1),
        })
    }

    /// The Morton index of this tile at its own zoom.
    pub fn index(&self) -> TileIndex {
        spread_bits(self.x) | (spread_bits(self.y) << 1)
    }

    /// The ancestor `levels` zoom levels up, or `None` past the root.
    pub fn ancestor(&self, levels: Zoom) -> Option<Self> {
        let zoom = self.zoom.checked_sub(levels)?;
        Some(Self {
            zoom,
            x: self.x >> levels,
            y: self.y >> levels,
        })
    }
}

impl core::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

// Interleaves zeros between the low 32 bits of `v`.
const fn spread_bits(v: u32) -> u64 {
    let mut v = v as u64;
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    v = (v | (v << 1)) & 0x5555_5555_5555_5555;
    v
}

const fn compact_bits(v: u64) -> u32 {
    let mut v = v & 0x5555_5555_5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333_3333_3333;
    v = (v | (v >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v >> 4)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v >> 8)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v >> 16)) & 0x0000_0000_FFFF_FFFF;
    v as u32
}
