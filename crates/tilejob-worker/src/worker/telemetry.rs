//! # Telemetry
//!
//! Logs are human-readable `tracing` events written to stderr, leaving stdout
//! for the expanded job. Verbosity follows `RUST_LOG` and defaults to `info`.
//!
//! Build with the `tracing` feature to also see spans and debug events from
//! the `tilejob` library itself:
//!
//! ```bash
//! RUST_LOG=tilejob=debug cargo run --features tracing -- --job job.json
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;
    Ok(())
}
