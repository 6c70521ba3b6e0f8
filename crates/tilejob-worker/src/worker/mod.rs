//! Job worker plumbing around the `tilejob` library.
//!
//! ## Structure
//!
//! - [`config`] - CLI arguments and validated runtime configuration.
//! - [`dataset`] - JSON job and source files.
//! - [`output`] - Writes expanded tiles to any [`std::io::Write`].
//! - [`telemetry`] - `tracing` subscriber setup.

pub mod config;
pub mod dataset;
pub mod output;
pub mod telemetry;
