use std::{collections::HashMap, sync::Arc};

use crate::{Error, Result, TileSource};

/// Named tile sources available to jobs.
///
/// A registry is an ordinary value handed to whoever builds jobs; there is no
/// process-wide instance.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn TileSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under `id`, returning any source it replaces.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        source: Arc<dyn TileSource>,
    ) -> Option<Arc<dyn TileSource>> {
        self.sources.insert(id.into(), source)
    }

    pub fn with_source(mut self, id: impl Into<String>, source: impl TileSource + 'static) -> Self {
        self.register(id, Arc::new(source));
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownSource`] if nothing is registered under `id`.
    pub fn get(&self, id: &str) -> Result<&dyn TileSource> {
        self.sources
            .get(id)
            .map(|source| source.as_ref())
            .ok_or_else(|| Error::UnknownSource { id: id.to_owned() })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl core::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut ids: Vec<_> = self.ids().collect();
        ids.sort_unstable();
        f.debug_struct("SourceRegistry").field("sources", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTileSource;

    #[test]
    fn resolves_registered_ids() {
        let registry = SourceRegistry::new()
            .with_source("sid", MemoryTileSource::new())
            .with_source("gid", MemoryTileSource::new().without_query());
        assert_eq!(registry.len(), 2);
        assert!(registry.get("sid").is_ok());
        assert_eq!(format!("{registry:?}"), r#"SourceRegistry { sources: ["gid", "sid"] }"#);
    }

    #[test]
    fn unknown_ids_fail() {
        let registry = SourceRegistry::new();
        assert!(registry.is_empty());
        match registry.get("osm") {
            Err(Error::UnknownSource { id }) => assert_eq!(id, "osm"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
