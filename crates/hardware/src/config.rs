//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures and enums used to parameterize
//! a simulation run. It provides:
//! 1. **Defaults:** Baseline geometry (1 MiB cache, 1 KiB blocks, 16 ways).
//! 2. **Structures:** [`CacheConfig`], deserializable from JSON, validated into a [`Geometry`].
//! 3. **Enums:** The eviction policy selector.
//! 4. **Size Parsing:** Byte counts with `K` / `M` suffixes as accepted by the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::Geometry;
use crate::common::constants::{KIB, MIB};
use crate::common::{CacheError, Result};

/// Default configuration constants for the simulator.
///
/// A 1 MiB, 16-way cache of 1 KiB blocks.
mod defaults {
    /// Default total cache capacity in bytes (1 MiB).
    pub const CACHE_SIZE: u64 = 1024 * 1024;

    /// Default block (line) size in bytes (1 KiB).
    pub const BLOCK_SIZE: u64 = 1024;

    /// Default associativity.
    pub const WAYS: usize = 16;

    /// Default number of sets: `CACHE_SIZE / BLOCK_SIZE / WAYS`.
    pub const SETS: usize = (CACHE_SIZE / BLOCK_SIZE) as usize / WAYS;

    /// Default address width, matching the default sample address `0xb7737f64`.
    pub const ADDRESS_BITS: u32 = 32;
}

/// Eviction policy algorithms.
///
/// Specifies the algorithm used to select which resident block to evict
/// when a new block must be installed in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicy {
    /// Uniformly random resident block.
    #[default]
    #[serde(alias = "Random", alias = "RANDOM")]
    Random,
    /// First In First Out: the block resident for the longest time.
    #[serde(alias = "Fifo", alias = "FIFO")]
    Fifo,
    /// Least Recently Used: the block touched longest ago.
    #[serde(alias = "Lru", alias = "LRU")]
    Lru,
    /// Least Frequently Used: the block with the fewest accesses since insertion.
    #[serde(alias = "Lfu", alias = "LFU")]
    Lfu,
}

impl ReplacementPolicy {
    /// Every policy, in the order sweeps report them.
    pub const ALL: [Self; 4] = [Self::Random, Self::Fifo, Self::Lru, Self::Lfu];

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Fifo => "fifo",
            Self::Lru => "lru",
            Self::Lfu => "lfu",
        }
    }

    /// Cache model name used in report headers and result file names.
    pub const fn cache_name(self) -> &'static str {
        match self {
            Self::Random => "Cache",
            Self::Fifo => "FIFOCache",
            Self::Lru => "LRUCache",
            Self::Lfu => "LFUCache",
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "fifo" => Ok(Self::Fifo),
            "lru" => Ok(Self::Lru),
            "lfu" => Ok(Self::Lfu),
            other => Err(format!(
                "unknown eviction policy `{other}` (expected random, fifo, lru or lfu)"
            )),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for a single cache.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, ReplacementPolicy};
///
/// let json = r#"{
///     "sets": 16,
///     "ways": 3,
///     "block_size": 1,
///     "policy": "fifo"
/// }"#;
///
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.sets, 16);
/// assert_eq!(config.policy, ReplacementPolicy::Fifo);
/// assert!(!config.write_no_allocate);
/// assert_eq!(config.address_bits, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Number of sets (power of two).
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity: blocks per set.
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Block size in bytes (power of two).
    #[serde(default = "CacheConfig::default_block_size")]
    pub block_size: u64,

    /// Address width in bits; only affects formatted dumps.
    #[serde(default = "CacheConfig::default_address_bits")]
    pub address_bits: u32,

    /// When true, a write miss does not bring the block into the cache.
    #[serde(default)]
    pub write_no_allocate: bool,

    /// Eviction policy used by every set.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Seed for the random policy. `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl CacheConfig {
    fn default_sets() -> usize {
        defaults::SETS
    }

    fn default_ways() -> usize {
        defaults::WAYS
    }

    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    fn default_address_bits() -> u32 {
        defaults::ADDRESS_BITS
    }

    /// Builds a configuration from a total capacity, block size and associativity.
    ///
    /// The set count is `cache_size / block_size / ways` using integer
    /// division; whether the result is a usable geometry is checked later by
    /// [`CacheConfig::geometry`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`] if `block_size` or `ways` is zero.
    pub fn from_capacity(cache_size: u64, block_size: u64, ways: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(CacheError::InvalidGeometry("block size must be non-zero".into()));
        }
        if ways == 0 {
            return Err(CacheError::InvalidGeometry("ways must be non-zero".into()));
        }
        let sets = (cache_size / block_size) / ways as u64;
        Ok(Self {
            sets: sets as usize,
            ways,
            block_size,
            ..Self::default()
        })
    }

    /// Sets the address width from a representative trace address.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidAddress`] if `sample` is not an address.
    pub fn with_sample_address(mut self, sample: &str) -> Result<Self> {
        self.address_bits = Geometry::address_bits_from_sample(sample)?;
        Ok(self)
    }

    /// Total capacity in bytes described by this configuration.
    pub fn capacity_bytes(&self) -> u64 {
        self.sets as u64 * self.ways as u64 * self.block_size
    }

    /// Validates the configuration into an immutable [`Geometry`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`] when the sets or block size are
    /// not powers of two, the ways are zero, or the address width exceeds 64 bits.
    pub fn geometry(&self) -> Result<Geometry> {
        Ok(
            Geometry::new(self.sets, self.ways, self.block_size, self.address_bits)?
                .with_write_no_allocate(self.write_no_allocate),
        )
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sets: defaults::SETS,
            ways: defaults::WAYS,
            block_size: defaults::BLOCK_SIZE,
            address_bits: defaults::ADDRESS_BITS,
            write_no_allocate: false,
            policy: ReplacementPolicy::default(),
            seed: None,
        }
    }
}

/// Parses a byte count such as `1024`, `4K` or `1M`.
///
/// The suffixes are binary: `K` is 1024 bytes and `M` is 1024 × 1024 bytes,
/// in either case.
///
/// # Errors
///
/// Returns [`CacheError::InvalidGeometry`] if the text is not a count with an
/// optional suffix, or the result overflows 64 bits.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::parse_byte_size;
///
/// assert_eq!(parse_byte_size("16").unwrap(), 16);
/// assert_eq!(parse_byte_size("1K").unwrap(), 1024);
/// assert_eq!(parse_byte_size("1M").unwrap(), 1_048_576);
/// ```
pub fn parse_byte_size(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let invalid = || CacheError::InvalidGeometry(format!("invalid byte size `{text}`"));
    let (digits, unit) = match trimmed.chars().last() {
        Some('K' | 'k') => (&trimmed[..trimmed.len() - 1], KIB),
        Some('M' | 'm') => (&trimmed[..trimmed.len() - 1], MIB),
        _ => (trimmed, 1),
    };
    let count: u64 = digits.parse().map_err(|_| invalid())?;
    count.checked_mul(unit).ok_or_else(invalid)
}
