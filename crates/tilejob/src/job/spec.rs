use crate::{
    Error, FilterSpec, JobIterator, Result, SourceRegistry, TileIndex, TileRange, Zoom,
    index_count, validate_zoom,
};

/// One entry of a job's tile list, expressed at the job zoom.
///
/// Serialized as either a bare integer or a `[from, before]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum TileRef {
    Single(TileIndex),
    Range(TileRange),
}

impl TileRef {
    /// The half-open range covered by this entry.
    pub const fn range(&self) -> TileRange {
        match *self {
            Self::Single(idx) => TileRange::single(idx),
            Self::Range(range) => range,
        }
    }
}

impl From<TileIndex> for TileRef {
    fn from(idx: TileIndex) -> Self {
        Self::Single(idx)
    }
}

impl From<TileRange> for TileRef {
    fn from(range: TileRange) -> Self {
        Self::Range(range)
    }
}

/// What a regeneration job must cover.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobSpec {
    pub zoom: Zoom,
    pub tiles: Vec<TileRef>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub filters: Option<Vec<FilterSpec>>,
}

impl JobSpec {
    pub fn new(zoom: Zoom, tiles: impl IntoIterator<Item = TileRef>) -> Self {
        Self {
            zoom,
            tiles: tiles.into_iter().collect(),
            filters: None,
        }
    }

    pub fn with_filters(mut self, filters: impl IntoIterator<Item = FilterSpec>) -> Self {
        self.filters = Some(filters.into_iter().collect());
        self
    }

    /// Filters to apply, empty when the job has none.
    pub fn filters(&self) -> &[FilterSpec] {
        self.filters.as_deref().unwrap_or_default()
    }

    /// Checks the zoom, that every bare index lies within `[0, 4^zoom)` and
    /// that every non-empty range ends at or before `4^zoom`. Empty ranges
    /// are accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZoom`] or [`Error::IndexOutOfRange`].
    pub fn validate(&self) -> Result<()> {
        let zoom = validate_zoom(self.zoom)?;
        let count = index_count(zoom);
        for tile in &self.tiles {
            match *tile {
                TileRef::Single(index) if index >= count => {
                    return Err(Error::IndexOutOfRange { index, zoom });
                }
                TileRef::Range(range) if !range.is_empty() && range.before > count => {
                    return Err(Error::IndexOutOfRange {
                        index: range.before,
                        zoom,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// A job as delivered by the job queue: the spec plus the ids of the store
/// and generator sources it runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Job {
    pub storage_id: String,
    pub generator_id: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub spec: JobSpec,
}

impl Job {
    /// Resolves both sources in `registry` and starts iterating the job.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSource`] or any error from
    /// [`JobIterator::new`].
    pub fn iter<'a>(&'a self, registry: &'a SourceRegistry) -> Result<JobIterator<'a>> {
        let store = registry.get(&self.storage_id)?;
        let generator = registry.get(&self.generator_id)?;
        JobIterator::new(&self.spec, store, generator)
    }
}
