use std::collections::{BTreeMap, BTreeSet};

use futures::{
    StreamExt,
    future::{self, BoxFuture},
    stream,
};

use crate::{
    Error, IndexStream, Result, Tile, TileCoord, TileIndex, TileQuery, TileSource, Zoom,
    validate_zoom,
};

/// An in-memory [`TileSource`] holding known tile indices per zoom level and,
/// optionally, their payloads.
///
/// Mostly useful for tests and for replaying dataset snapshots. Queries stream
/// straight out of the ordered index sets.
#[derive(Debug, Clone)]
pub struct MemoryTileSource {
    indices: BTreeMap<Zoom, BTreeSet<TileIndex>>,
    tiles: BTreeMap<TileCoord, Tile>,
    queryable: bool,
}

impl Default for MemoryTileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTileSource {
    pub fn new() -> Self {
        Self {
            indices: BTreeMap::new(),
            tiles: BTreeMap::new(),
            queryable: true,
        }
    }

    /// Disables the query capability, as for a backend that can only serve
    /// tiles.
    pub fn without_query(mut self) -> Self {
        self.queryable = false;
        self
    }

    pub fn with_indices(
        mut self,
        zoom: Zoom,
        indices: impl IntoIterator<Item = TileIndex>,
    ) -> Self {
        self.indices.entry(zoom).or_default().extend(indices);
        self
    }

    pub fn insert_index(&mut self, zoom: Zoom, index: TileIndex) -> bool {
        self.indices.entry(zoom).or_default().insert(index)
    }

    /// Stores a tile payload and records its index.
    pub fn insert_tile(&mut self, coord: TileCoord, tile: Tile) -> Option<Tile> {
        self.insert_index(coord.zoom, coord.index());
        self.tiles.insert(coord, tile)
    }

    pub fn contains(&self, zoom: Zoom, index: TileIndex) -> bool {
        self.indices
            .get(&zoom)
            .is_some_and(|set| set.contains(&index))
    }

    /// Number of indices known at `zoom`.
    pub fn len(&self, zoom: Zoom) -> usize {
        self.indices.get(&zoom).map_or(0, BTreeSet::len)
    }

    pub fn is_queryable(&self) -> bool {
        self.queryable
    }
}

impl TileSource for MemoryTileSource {
    fn get_tile(&self, coord: TileCoord) -> BoxFuture<'_, Result<Tile>> {
        let found = self.tiles.get(&coord).cloned().ok_or(Error::TileNotFound);
        Box::pin(future::ready(found))
    }

    fn query(&self, query: TileQuery) -> Result<IndexStream<'_>> {
        if !self.queryable {
            return Err(Error::QueryUnsupported);
        }
        validate_zoom(query.zoom)?;

        let range = query.range();
        match self.indices.get(&query.zoom) {
            Some(set) if !range.is_empty() => {
                Ok(stream::iter(set.range(range.iter()).copied().map(Ok)).boxed())
            }
            _ => Ok(stream::empty().boxed()),
        }
    }
}
