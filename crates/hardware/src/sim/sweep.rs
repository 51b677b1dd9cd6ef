//! Policy sweeps.
//!
//! Runs every eviction policy, with and without write allocation, over the
//! same trace and geometry, and writes `key,value` result files.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;
use tracing::debug;

use super::SimError;
use super::simulator::Simulator;
use super::trace::Trace;
use crate::config::{CacheConfig, ReplacementPolicy};
use crate::stats::CacheReport;

/// Outcome of one sweep combination.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepResult {
    /// Eviction policy used.
    pub policy: ReplacementPolicy,
    /// Whether write misses bypassed allocation.
    pub write_no_allocate: bool,
    /// Specs and counters of the finished run.
    pub report: CacheReport,
}

impl SweepResult {
    /// Label such as `LRUCache-wna` (write-no-allocate) or `FIFOCache-wa`.
    pub fn label(&self) -> String {
        let write = if self.write_no_allocate { "wna" } else { "wa" };
        format!("{}-{write}", self.policy.cache_name())
    }
}

impl fmt::Display for SweepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.report, f)
    }
}

/// Runs `trace` through a fresh cache for every policy and write policy.
///
/// Geometry and seed come from `base`; its policy and write-allocation
/// settings are overridden per combination. Results are ordered by policy
/// (Random, FIFO, LRU, LFU), write-no-allocate first.
///
/// # Errors
///
/// Returns [`SimError::Cache`] if the geometry is invalid or a run hits a
/// fatal cache error.
pub fn sweep(base: &CacheConfig, trace: &Trace) -> Result<Vec<SweepResult>, SimError> {
    let mut results = Vec::with_capacity(ReplacementPolicy::ALL.len() * 2);
    for policy in ReplacementPolicy::ALL {
        for write_no_allocate in [true, false] {
            let config = CacheConfig {
                policy,
                write_no_allocate,
                ..base.clone()
            };
            let mut sim = Simulator::for_trace(&config, trace)?;
            let _ = sim.run(trace)?;
            let result = SweepResult {
                policy,
                write_no_allocate,
                report: sim.cache.report(),
            };
            debug!(label = %result.label(), hit_rate = ?result.report.hit_rate, "sweep step");
            results.push(result);
        }
    }
    Ok(results)
}

/// Writes `key,value` pairs, one per line, with no trailing newline.
///
/// # Errors
///
/// Returns the first write error.
pub fn write_results_csv<W, K, V, I>(mut out: W, rows: I) -> io::Result<()>
where
    W: Write,
    K: fmt::Display,
    V: fmt::Display,
    I: IntoIterator<Item = (K, V)>,
{
    for (index, (key, value)) in rows.into_iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        write!(out, "{key},{value}")?;
    }
    out.flush()
}
