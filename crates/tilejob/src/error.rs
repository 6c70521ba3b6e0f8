use crate::index::{TileIndex, Zoom};

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Boxed error raised by an external collaborator.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// All errors that `tilejob` can produce.
///
/// An empty half-open range (`before <= from`) is never an error; it simply
/// produces an empty stream.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The zoom level is outside of `0..=MAX_ZOOM`.
    #[error("invalid zoom {zoom}: must not exceed {max}", max = crate::MAX_ZOOM)]
    InvalidZoom { zoom: Zoom },

    /// A tile index or range bound lies outside `[0, 4^zoom]`.
    #[error("tile index {index} is out of range for zoom {zoom}")]
    IndexOutOfRange { index: TileIndex, zoom: Zoom },

    /// Tile coordinates lie outside the `2^zoom` grid.
    #[error("tile {x}/{y} is out of range for zoom {zoom}")]
    CoordOutOfRange { x: u32, y: u32, zoom: Zoom },

    /// A filter descriptor cannot be applied to the job.
    #[error("invalid filter: {reason}")]
    InvalidFilter { reason: String },

    /// A filter descriptor targets a strategy version that is not available.
    #[error("unsupported filter version {version}, expected {expected}")]
    UnsupportedFilterVersion { version: u32, expected: u32 },

    /// No source is registered under the requested id.
    #[error("unknown source {id:?}")]
    UnknownSource { id: String },

    /// The collaborator does not expose a `query` capability.
    #[error("source does not support index queries")]
    QueryUnsupported,

    /// The requested tile is absent. This is an expected outcome, not a fault.
    ///
    /// The message is kept verbatim so it can be matched across process
    /// boundaries.
    #[error("Tile does not exist")]
    TileNotFound,

    /// An external collaborator failed. Never retried internally.
    #[error("collaborator failure: {0}")]
    Collaborator(#[source] BoxError),
}

impl Error {
    /// Wraps an arbitrary collaborator error.
    pub fn collaborator<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Collaborator(err.into())
    }

    /// Returns `true` when the error is the "tile does not exist" sentinel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TileNotFound)
    }
}
