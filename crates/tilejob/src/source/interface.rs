use std::collections::BTreeMap;

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::{Error, IndexStream, Result, TileCoord, TileIndex, TileRange, Zoom};

/// A rendered or stored tile payload with its response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    pub data: Bytes,
    pub headers: BTreeMap<String, String>,
}

impl Tile {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Parameters of an existing-data query: the half-open index bound
/// `[idx_from, idx_before)` at `zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TileQuery {
    pub zoom: Zoom,
    pub idx_from: TileIndex,
    pub idx_before: TileIndex,
}

impl TileQuery {
    pub const fn new(zoom: Zoom, idx_from: TileIndex, idx_before: TileIndex) -> Self {
        Self {
            zoom,
            idx_from,
            idx_before,
        }
    }

    pub const fn range(&self) -> TileRange {
        TileRange::new(self.idx_from, self.idx_before)
    }
}

/// A tile store or tile generator consulted by a job.
///
/// Implementations own their calling conventions: whatever the backend looks
/// like, it is exposed here as a future or a stream of [`Result`]s.
pub trait TileSource: Send + Sync {
    /// Fetches a single tile.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TileNotFound`] when the tile does not exist, and
    /// with [`Error::Collaborator`] for backend failures.
    fn get_tile(&self, coord: TileCoord) -> BoxFuture<'_, Result<Tile>>;

    /// Streams, strictly ascending, the indices present within the query
    /// bound.
    ///
    /// Sources without a query capability keep the default, which fails with
    /// [`Error::QueryUnsupported`].
    ///
    /// # Errors
    ///
    /// Failures may be reported here or on any pull of the returned stream.
    fn query(&self, query: TileQuery) -> Result<IndexStream<'_>> {
        let _ = query;
        Err(Error::QueryUnsupported)
    }

    /// Like [`TileSource::get_tile`], but maps the "tile does not exist"
    /// sentinel to `None`.
    fn find_tile(&self, coord: TileCoord) -> BoxFuture<'_, Result<Option<Tile>>> {
        Box::pin(async move {
            match self.get_tile(coord).await {
                Ok(tile) => Ok(Some(tile)),
                Err(err) if err.is_not_found() => Ok(None),
                Err(err) => Err(err),
            }
        })
    }
}
