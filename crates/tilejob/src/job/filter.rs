//! Existing-data filters.
//!
//! A filter narrows a job entry by checking a collaborator's existing data.
//! How filters combine is owned by a [`FilterStrategy`], and every
//! [`FilterSpec`] names the strategy version it was written for. Specs
//! targeting another version are rejected up front instead of being
//! reinterpreted.

use futures::StreamExt;

use crate::{
    Error, IndexStream, Result, TileQuery, TileRange, TileSource, TileStreamExt, Zoom,
    index_count,
};

/// Which collaborator a filter consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilterSource {
    #[default]
    Store,
    Generator,
}

/// A filter descriptor attached to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterSpec {
    /// Strategy version this descriptor targets.
    pub version: u32,
    /// Zoom offset, relative to the job zoom, at which existing data is
    /// checked.
    pub zoom: i8,
    pub source: FilterSource,
    /// Keep tiles *not* covered by existing data instead of covered ones.
    pub missing: bool,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            version: FilterV1::VERSION,
            zoom: 0,
            source: FilterSource::Store,
            missing: false,
        }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_zoom_offset(mut self, zoom: i8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn against(mut self, source: FilterSource) -> Self {
        self.source = source;
        self
    }

    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }
}

/// Everything a filter may touch while narrowing one job entry.
#[derive(Clone, Copy)]
pub struct FilterScope<'a> {
    /// The job zoom.
    pub zoom: Zoom,
    /// The entry being narrowed.
    pub bounds: TileRange,
    pub store: &'a dyn TileSource,
    pub generator: &'a dyn TileSource,
}

impl<'a> FilterScope<'a> {
    pub fn source(&self, source: FilterSource) -> &'a dyn TileSource {
        match source {
            FilterSource::Store => self.store,
            FilterSource::Generator => self.generator,
        }
    }
}

/// A versioned rule for applying job filters.
pub trait FilterStrategy {
    /// The [`FilterSpec::version`] this strategy understands.
    fn version(&self) -> u32;

    /// Validates `filter` for a job at `zoom` without touching any source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFilterVersion`] or
    /// [`Error::InvalidFilter`].
    fn check(&self, filter: &FilterSpec, zoom: Zoom) -> Result<()>;

    /// Narrows the ascending `candidates` of `scope.bounds` by `filter`.
    ///
    /// Applied once per filter, in declaration order, with the output of one
    /// filter becoming the candidates of the next.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures raised while issuing queries.
    fn apply<'a>(
        &self,
        candidates: IndexStream<'a>,
        filter: &FilterSpec,
        scope: FilterScope<'a>,
    ) -> Result<IndexStream<'a>>;
}

/// Version 1 filter semantics.
///
/// - `zoom` is an offset in `-job_zoom..=0`; existing data is checked at
///   `job_zoom + zoom`, where one tile covers `4^-zoom` job tiles.
/// - The chosen source is queried once per entry, over the ancestor bound of
///   the entry.
/// - `missing = false` keeps candidates covered by existing data,
///   `missing = true` keeps the uncovered ones.
/// - Several filters all have to hold: each one narrows the result of the
///   previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterV1;

impl FilterV1 {
    pub const VERSION: u32 = 1;

    // Zoom levels between the job zoom and the checked zoom.
    fn depth(filter: &FilterSpec, zoom: Zoom) -> Result<Zoom> {
        if filter.zoom > 0 {
            return Err(Error::InvalidFilter {
                reason: format!(
                    "zoom offset {} is positive; only ancestor zoom levels can be checked",
                    filter.zoom
                ),
            });
        }
        let depth = filter.zoom.unsigned_abs();
        if depth > zoom {
            return Err(Error::InvalidFilter {
                reason: format!(
                    "zoom offset {} reaches below zoom 0 from zoom {zoom}",
                    filter.zoom
                ),
            });
        }
        Ok(depth)
    }
}

impl FilterStrategy for FilterV1 {
    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn check(&self, filter: &FilterSpec, zoom: Zoom) -> Result<()> {
        if filter.version != Self::VERSION {
            return Err(Error::UnsupportedFilterVersion {
                version: filter.version,
                expected: Self::VERSION,
            });
        }
        Self::depth(filter, zoom).map(drop)
    }

    fn apply<'a>(
        &self,
        candidates: IndexStream<'a>,
        filter: &FilterSpec,
        scope: FilterScope<'a>,
    ) -> Result<IndexStream<'a>> {
        let depth = Self::depth(filter, scope.zoom)?;
        let scale = index_count(depth);
        let bounds = scope.bounds;
        let query = TileQuery::new(
            scope.zoom - depth,
            bounds.from / scale,
            bounds.before.div_ceil(scale),
        );

        #[cfg(feature = "tracing")]
        tracing::trace!(?query, ?filter, "querying existing data");

        let covered = scope
            .source(filter.source)
            .query(query)?
            .descendants(depth, bounds);
        let selected = if filter.missing {
            covered.complement(bounds.from, bounds.before).boxed()
        } else {
            covered.boxed()
        };
        Ok(candidates.intersect(selected).boxed())
    }
}
