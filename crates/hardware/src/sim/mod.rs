//! Trace-driven simulation.
//!
//! Everything between a memory trace on disk and a finished [`Cache`](crate::Cache):
//! 1. **Trace reading:** Parsing `R`/`W` lines and picking the sample address.
//! 2. **Driving:** Replaying a trace through a cache and collecting its counters.
//! 3. **Sweeps:** Every policy with and without write allocation over one trace.
//! 4. **Workloads:** Synthetic traces of a blocked matrix product.
//! 5. **Studies:** Hit rate against matrix size for each blocking factor and policy.

/// Blocked matrix-multiply trace generator.
pub mod matmul;

/// Trace replay into a single cache.
pub mod simulator;

/// Matrix-size and blocking-factor studies.
pub mod study;

/// Policy and write-allocation sweeps.
pub mod sweep;

/// Memory trace parsing.
pub mod trace;

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::common::CacheError;
use crate::config::CacheConfig;

pub use matmul::MatmulTrace;
pub use simulator::Simulator;
pub use study::{BlockingStudy, StudySeries, write_study};
pub use sweep::{SweepResult, sweep, write_results_csv};
pub use trace::{Trace, TraceEntry};

/// Errors surfaced by the simulation driver.
#[derive(Debug, Error)]
pub enum SimError {
    /// Reading a trace or configuration, or writing results, failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The cache model rejected its configuration or hit a fatal condition.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// JSON (de)serialization failed, typically a malformed configuration file.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Matrix-multiply parameters do not describe a blocked product.
    #[error("invalid matrix trace parameters: {0}")]
    InvalidWorkload(String),
}

/// Loads a [`CacheConfig`] from a JSON file. Missing fields take their defaults.
///
/// # Errors
///
/// Returns [`SimError::Io`] if the file cannot be read and
/// [`SimError::Json`] if it is not a valid configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<CacheConfig, SimError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
