//! Structured logging setup for the `mcbs` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary (or to tests that want output). Logs go to stderr so stdout
//! stays reserved for the JSON run summary.
//!
//! | Target | Description |
//! |--------|-------------|
//! | `mcbs.step` | Per-step decision (debug) |
//! | `mcbs.estimator` | Predictive density internals (trace) |
//! | `mcbs.select` | Vote weight renormalization (warn) |
//! | `mcbs.run` | Run completion (info) |
//! | `mcbs.realizations` | Realization batches (info) |

use mcbs_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON lines, one event per line
    Json,
    /// Compact single-line format
    Compact,
}

/// Install the global subscriber.
///
/// The filter comes from `filter_override`, else `RUST_LOG`, else `info`.
pub fn init_logging(format: LogFormat, filter_override: Option<&str>) -> Result<()> {
    let filter = match filter_override {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| Error::Config(format!("invalid log filter {directives:?}: {e}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.with_target(false).try_init(),
    };
    installed.map_err(|e| Error::Config(format!("logging already initialized: {e}")))
}
