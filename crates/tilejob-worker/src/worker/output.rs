use super::config::WorkerConfig;
use futures::{StreamExt, TryStreamExt};
use std::{io::Write, pin::pin};
use tilejob::{Job, SourceRegistry, TileStreamExt};

/// Counts reported once a job has been written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub tiles: u64,
    pub ranges: u64,
    pub truncated: bool,
}

/// Expands `job` against `registry` and writes it to `out`.
///
/// Plain output is one index per line; compact output is one `[from,before]`
/// JSON pair per line. Lines already written stay written if the job fails
/// part way through.
pub async fn write_job<W: Write>(
    job: &Job,
    registry: &SourceRegistry,
    config: &WorkerConfig,
    out: &mut W,
) -> anyhow::Result<Summary> {
    let mut tiles = job.iter(registry)?;
    let limit = config
        .limit
        .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

    let mut summary = Summary::default();
    if config.compact {
        let mut ranges = pin!(tiles.by_ref().take(limit).compact());
        while let Some(range) = ranges.try_next().await? {
            serde_json::to_writer(&mut *out, &range)?;
            writeln!(out)?;
            summary.tiles += range.len();
            summary.ranges += 1;
        }
    } else {
        let mut head = tiles.by_ref().take(limit);
        while let Some(idx) = head.try_next().await? {
            writeln!(out, "{idx}")?;
            summary.tiles += 1;
        }
    }

    // Only a tile beyond the limit means the output was cut short. Whatever
    // that pull returns, it is not written.
    if config.limit.is_some() {
        summary.truncated = tiles.next().await.is_some();
    }
    Ok(summary)
}
