//! Simulator: replays a memory trace into one cache.

use tracing::info;

use super::SimError;
use super::trace::{Trace, TraceEntry};
use crate::cache::Cache;
use crate::common::{AccessOutcome, Result};
use crate::config::CacheConfig;
use crate::stats::CacheStats;

/// Owns a cache and feeds it trace entries.
#[derive(Debug)]
pub struct Simulator {
    /// The cache under simulation.
    pub cache: Cache,
}

impl Simulator {
    /// Creates a simulator around an empty cache built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Cache`] if the configuration is not a valid geometry.
    pub fn new(config: &CacheConfig) -> std::result::Result<Self, SimError> {
        Ok(Self {
            cache: Cache::new(config)?,
        })
    }

    /// Creates a simulator whose address width comes from `trace`'s sample
    /// address. An empty trace keeps the configured width.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Cache`] if the sample address or the resulting
    /// geometry is invalid.
    pub fn for_trace(config: &CacheConfig, trace: &Trace) -> std::result::Result<Self, SimError> {
        let config = match trace.sample_address() {
            Some(sample) => config.clone().with_sample_address(sample)?,
            None => config.clone(),
        };
        Self::new(&config)
    }

    /// Wraps an existing cache.
    pub const fn from_cache(cache: Cache) -> Self {
        Self { cache }
    }

    /// Applies a single trace entry.
    ///
    /// # Errors
    ///
    /// Propagates fatal cache errors.
    pub fn step(&mut self, entry: &TraceEntry) -> Result<AccessOutcome> {
        self.cache.access(entry.op, entry.addr)
    }

    /// Applies every entry in order and returns the cache's counters.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal cache error.
    pub fn run<'a, I>(&mut self, entries: I) -> Result<CacheStats>
    where
        I: IntoIterator<Item = &'a TraceEntry>,
    {
        for entry in entries {
            let _ = self.step(entry)?;
        }
        let stats = self.cache.stats();
        info!(
            cache = %self.cache.specs().name,
            accesses = stats.access_count,
            cold_misses = stats.cold_miss_count,
            conflict_misses = stats.conflict_miss_count,
            evictions = stats.eviction_count,
            "run complete"
        );
        Ok(stats)
    }

    /// Consumes the simulator, returning the cache.
    pub fn into_cache(self) -> Cache {
        self.cache
    }
}
