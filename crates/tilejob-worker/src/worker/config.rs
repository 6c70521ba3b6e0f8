use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;

/// Runtime configuration for the `tilejob-worker` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file in the working directory is honored).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tilejob-worker",
    version,
    about = "Expands a tile regeneration job into the tile indices it covers"
)]
pub struct CliArgs {
    /// Path to the JSON job description.
    ///
    /// The file holds `storageId`, `generatorId`, `zoom`, `tiles` and an
    /// optional `filters` list.
    ///
    /// Environment variable: `JOB_FILE`
    #[arg(long, env = "JOB_FILE")]
    pub job: PathBuf,

    /// Path to a JSON file describing the tile sources a job may reference.
    ///
    /// Maps each source id to `{ "query": bool, "zooms": { "<zoom>": [idx...] } }`.
    /// When omitted, the job's store and generator are registered as empty
    /// sources, which is enough for jobs without filters.
    ///
    /// Environment variable: `SOURCES_FILE`
    #[arg(long, env = "SOURCES_FILE")]
    pub sources: Option<PathBuf>,

    /// Print maximal `[from, before]` ranges instead of one index per line.
    ///
    /// Environment variable: `COMPACT_OUTPUT`
    #[arg(long, env = "COMPACT_OUTPUT", default_value_t = false)]
    pub compact: bool,

    /// Stop after this many tiles.
    ///
    /// Environment variable: `MAX_ITEMS`
    #[arg(long, env = "MAX_ITEMS")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub job_file: PathBuf,
    pub sources_file: Option<PathBuf>,
    pub compact: bool,
    pub limit: Option<u64>,
}

impl TryFrom<CliArgs> for WorkerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.sources.as_ref() == Some(&args.job) {
            bail!(
                "SOURCES_FILE ({}) must differ from JOB_FILE",
                args.job.display()
            );
        }

        if args.limit == Some(0) {
            bail!("MAX_ITEMS must be greater than 0");
        }

        Ok(Self {
            job_file: args.job,
            sources_file: args.sources,
            compact: args.compact,
            limit: args.limit,
        })
    }
}
