//! Blocking-Factor Study.
//!
//! Replays blocked matrix-multiply traces over a grid of matrix sizes and
//! blocking factors, once per eviction policy, and records the hit rate of
//! each run. Every run uses a fresh write-no-allocate cache built from the
//! same base geometry. Results are grouped into one series per
//! `(policy, blocking factor)` pair and written as `results-<Cache>-<bf>.txt`
//! files of `matrix_size,hit_rate` lines.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::SimError;
use super::matmul::MatmulTrace;
use super::simulator::Simulator;
use super::sweep::write_results_csv;
use crate::config::{CacheConfig, ReplacementPolicy};

/// Default blocking factors.
pub const BLOCKING_FACTORS: [usize; 5] = [1, 2, 4, 8, 16];

/// Default matrix sizes: 16 to 96 in steps of 16.
pub const MATRIX_SIZES: [usize; 6] = [16, 32, 48, 64, 80, 96];

/// The grid a study runs over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockingStudy {
    /// Policies to compare.
    pub policies: Vec<ReplacementPolicy>,
    /// Blocks per matrix row.
    pub blocking_factors: Vec<usize>,
    /// Matrix dimensions; each must be a multiple of every blocking factor.
    pub matrix_sizes: Vec<usize>,
}

impl Default for BlockingStudy {
    fn default() -> Self {
        Self {
            policies: ReplacementPolicy::ALL.to_vec(),
            blocking_factors: BLOCKING_FACTORS.to_vec(),
            matrix_sizes: MATRIX_SIZES.to_vec(),
        }
    }
}

/// Hit rate against matrix size for one policy and blocking factor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudySeries {
    /// Eviction policy used.
    pub policy: ReplacementPolicy,
    /// Blocks per matrix row.
    pub blocking_factor: usize,
    /// `(matrix_size, hit_rate)` in the order the sizes were given.
    pub points: Vec<(usize, Option<f64>)>,
}

impl StudySeries {
    /// Result file name, such as `results-LRUCache-4.txt`.
    pub fn file_name(&self) -> String {
        format!(
            "results-{}-{}.txt",
            self.policy.cache_name(),
            self.blocking_factor
        )
    }
}

impl BlockingStudy {
    /// Runs every `(policy, blocking factor, matrix size)` combination.
    ///
    /// Geometry and seed come from `base`; the policy is overridden per
    /// series and write misses never allocate. Series are ordered by policy,
    /// then blocking factor.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidWorkload`] if a blocking factor is zero or
    /// does not divide a matrix size, and [`SimError::Cache`] if the geometry
    /// is invalid or a run hits a fatal cache error.
    pub fn run(&self, base: &CacheConfig) -> Result<Vec<StudySeries>, SimError> {
        let workloads = self
            .blocking_factors
            .iter()
            .map(|&bf| {
                self.matrix_sizes
                    .iter()
                    .map(|&size| MatmulTrace::new(size, bf))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut series = Vec::with_capacity(self.policies.len() * workloads.len());
        for &policy in &self.policies {
            let config = CacheConfig {
                policy,
                write_no_allocate: true,
                ..base.clone()
            };
            for (&blocking_factor, row) in self.blocking_factors.iter().zip(&workloads) {
                let mut points = Vec::with_capacity(row.len());
                for workload in row {
                    let trace = workload.to_trace();
                    let mut sim = Simulator::for_trace(&config, &trace)?;
                    let stats = sim.run(&trace)?;
                    debug!(
                        policy = %policy,
                        blocking_factor,
                        size = workload.size(),
                        hit_rate = ?stats.hit_rate(),
                        "study point"
                    );
                    points.push((workload.size(), stats.hit_rate()));
                }
                series.push(StudySeries {
                    policy,
                    blocking_factor,
                    points,
                });
            }
        }
        info!(series = series.len(), "blocking study complete");
        Ok(series)
    }
}

/// Writes each series to `dir/<file name>` and returns the paths written.
///
/// An undefined hit rate is written as `undefined`.
///
/// # Errors
///
/// Returns [`SimError::Io`] on the first file that cannot be written.
pub fn write_study(dir: &Path, series: &[StudySeries]) -> Result<Vec<PathBuf>, SimError> {
    series
        .iter()
        .map(|s| {
            let path = dir.join(s.file_name());
            let rows = s.points.iter().map(|&(size, rate)| {
                (size, rate.map_or_else(|| "undefined".to_string(), |r| r.to_string()))
            });
            write_results_csv(BufWriter::new(File::create(&path)?), rows)?;
            Ok::<_, SimError>(path)
        })
        .collect()
}
