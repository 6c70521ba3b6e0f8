use anyhow::Context;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};
use tilejob::{Job, MemoryTileSource, SourceRegistry, TileIndex, Zoom};

/// One entry of the sources file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDef {
    /// Whether the source answers index queries.
    #[serde(default = "default_query")]
    pub query: bool,
    /// Existing tile indices per zoom level.
    #[serde(default)]
    pub zooms: BTreeMap<Zoom, Vec<TileIndex>>,
}

const fn default_query() -> bool {
    true
}

impl From<SourceDef> for MemoryTileSource {
    fn from(def: SourceDef) -> Self {
        let source = def
            .zooms
            .into_iter()
            .fold(Self::new(), |source, (zoom, indices)| {
                source.with_indices(zoom, indices)
            });
        if def.query {
            source
        } else {
            source.without_query()
        }
    }
}

pub fn parse_job(bytes: &[u8]) -> anyhow::Result<Job> {
    let job: Job = serde_json::from_slice(bytes).context("malformed job description")?;
    job.spec.validate().context("invalid job description")?;
    Ok(job)
}

/// Builds a registry from the sources file contents.
///
/// Any of the job's sources missing from the file is registered empty.
pub fn parse_registry(bytes: Option<&[u8]>, job: &Job) -> anyhow::Result<SourceRegistry> {
    let defs: BTreeMap<String, SourceDef> = match bytes {
        Some(bytes) => serde_json::from_slice(bytes).context("malformed sources file")?,
        None => BTreeMap::new(),
    };

    let mut registry = defs
        .into_iter()
        .fold(SourceRegistry::new(), |registry, (id, def)| {
            registry.with_source(id, MemoryTileSource::from(def))
        });

    for id in [&job.storage_id, &job.generator_id] {
        if registry.get(id).is_err() {
            tracing::debug!(source = %id, "Registering empty source");
            registry = registry.with_source(id.clone(), MemoryTileSource::new());
        }
    }

    Ok(registry)
}

pub async fn load_job(path: &Path) -> anyhow::Result<Job> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read job file {}", path.display()))?;
    parse_job(&bytes)
}

pub async fn load_registry(path: Option<&Path>, job: &Job) -> anyhow::Result<SourceRegistry> {
    let bytes = match path {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read sources file {}", path.display()))?,
        ),
        None => None,
    };
    parse_registry(bytes.as_deref(), job)
}
