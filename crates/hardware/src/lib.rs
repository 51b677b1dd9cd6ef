//! Trace-driven cache simulator library.
//!
//! This crate models a set-associative cache fed by a memory trace:
//! 1. **Cache:** Address decoding, associative sets and cold/conflict miss classification.
//! 2. **Policies:** Random, FIFO, LRU and LFU eviction, one instance per set.
//! 3. **Write Handling:** Write-allocate or write-no-allocate, with dirty-block write-back.
//! 4. **Simulation:** Trace reading, replay, policy sweeps and synthetic workloads.
//! 5. **Reporting:** Counters, hit rates and a per-set residency dump.

/// Cache model (geometry, decoder, sets, eviction policies).
pub mod cache;
/// Common types and constants (addresses, tags, access types, errors).
pub mod common;
/// Cache configuration (defaults, policy enum, serde config structure).
pub mod config;
/// Trace reading, replay, sweeps and workload generation.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Set-associative cache; construct with `Cache::new(&CacheConfig)`.
pub use crate::cache::Cache;
/// Error type for every fatal condition of the cache model.
pub use crate::common::CacheError;
/// Cache configuration; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::{CacheConfig, ReplacementPolicy};
/// Trace replay driver.
pub use crate::sim::Simulator;
/// Summed counters of a cache.
pub use crate::stats::CacheStats;
