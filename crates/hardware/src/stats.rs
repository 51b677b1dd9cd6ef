//! Simulation statistics collection and reporting.
//!
//! This module aggregates the per-set counters of a cache. It provides:
//! 1. **Counters:** Accesses, cold misses, conflict misses, evictions and write-backs.
//! 2. **Derived rates:** Hit rate and miss rates, undefined before the first access.
//! 3. **Reports:** A specs + counters report in text (for terminals) or JSON (for tooling).

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::Serialize;

use crate::cache::Set;
use crate::common::constants::{KIB, MIB};

/// Summed counters for a cache, or for any group of sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Accesses handled.
    pub access_count: u64,
    /// First-ever accesses to a tag within its set.
    pub cold_miss_count: u64,
    /// Accesses to a previously seen tag that was no longer resident.
    pub conflict_miss_count: u64,
    /// Blocks evicted to make room.
    pub eviction_count: u64,
    /// Dirty blocks evicted (write-back hook invocations).
    pub write_back_count: u64,
}

impl CacheStats {
    /// Counters of a single set.
    pub const fn from_set(set: &Set) -> Self {
        Self {
            access_count: set.access_count(),
            cold_miss_count: set.cold_miss_count(),
            conflict_miss_count: set.conflict_miss_count(),
            eviction_count: set.eviction_count(),
            write_back_count: set.write_back_count(),
        }
    }

    /// Total misses of either kind.
    pub const fn miss_count(&self) -> u64 {
        self.cold_miss_count + self.conflict_miss_count
    }

    /// Accesses that were neither kind of miss.
    pub const fn hit_count(&self) -> u64 {
        self.access_count - self.miss_count()
    }

    /// `1 - misses / accesses`, or `None` when nothing was accessed.
    pub fn hit_rate(&self) -> Option<f64> {
        self.miss_rate().map(|rate| 1.0 - rate)
    }

    /// `misses / accesses`, or `None` when nothing was accessed.
    pub fn miss_rate(&self) -> Option<f64> {
        self.ratio(self.miss_count())
    }

    /// `conflict misses / accesses`, or `None` when nothing was accessed.
    pub fn conflict_miss_rate(&self) -> Option<f64> {
        self.ratio(self.conflict_miss_count)
    }

    fn ratio(&self, count: u64) -> Option<f64> {
        if self.access_count == 0 {
            None
        } else {
            Some(count as f64 / self.access_count as f64)
        }
    }
}

impl Add for CacheStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            access_count: self.access_count + rhs.access_count,
            cold_miss_count: self.cold_miss_count + rhs.cold_miss_count,
            conflict_miss_count: self.conflict_miss_count + rhs.conflict_miss_count,
            eviction_count: self.eviction_count + rhs.eviction_count,
            write_back_count: self.write_back_count + rhs.write_back_count,
        }
    }
}

impl AddAssign for CacheStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for CacheStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Static description of a cache, printed above its counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheSpecs {
    /// Cache model name (`Cache`, `FIFOCache`, `LRUCache`, `LFUCache`).
    pub name: String,
    /// Eviction policy name.
    pub policy: String,
    /// Total capacity in bytes.
    pub capacity_bytes: u64,
    /// Block size in bytes.
    pub block_size: u64,
    /// Number of sets.
    pub sets: usize,
    /// Ways per set.
    pub ways: usize,
    /// Whether write misses bypass allocation.
    pub write_no_allocate: bool,
}

/// Specs plus counters of one finished run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheReport {
    /// What was simulated.
    pub specs: CacheSpecs,
    /// What happened.
    pub stats: CacheStats,
    /// Hit rate in `[0, 1]`; `null` in JSON when nothing was accessed.
    pub hit_rate: Option<f64>,
}

impl CacheReport {
    /// Builds a report, deriving the hit rate from `stats`.
    pub fn new(specs: CacheSpecs, stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            specs,
            stats,
        }
    }
}

/// Formats a byte count with the largest binary suffix that divides it evenly
/// enough for a report (`1M`, `64K`, `16`).
pub fn format_size(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{}M", bytes / MIB)
    } else if bytes >= KIB {
        format!("{}K", bytes / KIB)
    } else {
        bytes.to_string()
    }
}

const SEPARATOR: &str = "==================";

impl fmt::Display for CacheReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specs = &self.specs;
        let stats = &self.stats;
        writeln!(f, "{:<width$}", format!("{} specs", specs.name), width = SEPARATOR.len())?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "size       : {}", format_size(specs.capacity_bytes))?;
        writeln!(f, "block size : {}", format_size(specs.block_size))?;
        writeln!(f, "sets       : {}", specs.sets)?;
        writeln!(f, "ways       : {}", specs.ways)?;
        writeln!(f, "policy     : {}", specs.policy)?;
        writeln!(
            f,
            "write miss : {}",
            if specs.write_no_allocate { "no-allocate" } else { "allocate" }
        )?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "{}\taccess count", stats.access_count)?;
        writeln!(f, "{}\tcold miss count", stats.cold_miss_count)?;
        writeln!(f, "{}\tconflict miss count", stats.conflict_miss_count)?;
        writeln!(f, "{}\teviction count", stats.eviction_count)?;
        writeln!(f, "{}\twrite back count", stats.write_back_count)?;
        match self.hit_rate {
            Some(rate) => write!(f, "Hit Rate : {:.3}%", rate * 100.0),
            None => write!(f, "Hit Rate : undefined"),
        }
    }
}
