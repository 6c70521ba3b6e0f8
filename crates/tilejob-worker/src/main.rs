#![doc = include_str!("../README.md")]

mod worker;

use clap::Parser;
use std::io::{self, Write};
use worker::config::{CliArgs, WorkerConfig};
use worker::dataset::{load_job, load_registry};
use worker::output::{Summary, write_job};
use worker::telemetry::init_telemetry;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = WorkerConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let job = load_job(&config.job_file).await?;
    let registry = load_registry(config.sources_file.as_deref(), &job).await?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let summary = write_job(&job, &registry, &config, &mut out).await;
    out.flush()?;
    let summary = summary?;

    log_summary(&summary, &config);
    Ok(())
}

fn log_startup_info(config: &WorkerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting tile job worker with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting tile job worker for {}",
            config.job_file.display()
        );
    }
}

fn log_summary(summary: &Summary, config: &WorkerConfig) {
    if summary.truncated {
        tracing::warn!(
            limit = ?config.limit,
            "Output truncated after {} tiles",
            summary.tiles
        );
    }
    tracing::info!(
        tiles = summary.tiles,
        ranges = summary.ranges,
        "Job expanded"
    );
}
