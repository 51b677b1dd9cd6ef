//! Set-Associative Cache Simulator.
//!
//! This module implements a trace-driven set-associative cache model. An
//! address is split into tag, set index and block offset; the set index
//! routes the access to one [`Set`], which classifies it as a hit, cold miss
//! or conflict miss and evicts through its own policy when full.
//!
//! Only residency is modelled: there is no data, no latency and no lower
//! memory level.

/// Address splitting into tag, set index and offset.
pub mod decoder;

/// Immutable cache shape and bit-field widths.
pub mod geometry;

/// Eviction policy implementations (Random, FIFO, LRU, LFU).
pub mod policies;

/// One associative set with miss classification.
pub mod set;

use std::fmt;

use tracing::trace;

pub use decoder::{AddressDecoder, DecodedAddress};
pub use geometry::Geometry;
pub use policies::{EvictionPolicy, build_policy};
pub use set::{Block, Set};

use crate::common::constants::BITS_PER_HEX_DIGIT;
use crate::common::{AccessOutcome, AccessType, Address, Result};
use crate::config::{CacheConfig, ReplacementPolicy};
use crate::stats::{CacheReport, CacheSpecs, CacheStats};

/// A set-associative cache: a decoder plus one [`Set`] per set index.
#[derive(Debug)]
pub struct Cache {
    geometry: Geometry,
    decoder: AddressDecoder,
    name: &'static str,
    sets: Vec<Set>,
}

impl Cache {
    /// Creates an empty cache from a configuration.
    ///
    /// Every set gets its own policy instance. With a seed, set `i` seeds its
    /// random source with `seed + i`, so runs are reproducible without sets
    /// sharing a stream.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`](crate::common::CacheError::InvalidGeometry)
    /// when the configuration does not describe a valid geometry.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let geometry = config.geometry()?;
        Self::with_policies(geometry, |index| {
            build_policy(
                config.policy,
                config.seed.map(|seed| seed.wrapping_add(index as u64)),
            )
        })
    }

    /// Creates an empty cache, building set `i`'s policy with `make_policy(i)`.
    ///
    /// The report name follows the first set's policy; a policy that is not
    /// one of the built-in variants reports as a plain `Cache`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`](crate::common::CacheError::InvalidGeometry)
    /// if a set cannot be built.
    pub fn with_policies<F>(geometry: Geometry, mut make_policy: F) -> Result<Self>
    where
        F: FnMut(usize) -> Box<dyn EvictionPolicy>,
    {
        let sets = (0..geometry.n_sets())
            .map(|index| {
                Set::new(
                    geometry.n_ways(),
                    geometry.write_no_allocate(),
                    make_policy(index),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        let name = sets
            .first()
            .and_then(|set| set.policy().name().parse::<ReplacementPolicy>().ok())
            .map_or(ReplacementPolicy::Random.cache_name(), ReplacementPolicy::cache_name);
        Ok(Self {
            geometry,
            decoder: geometry.decoder(),
            name,
            sets,
        })
    }

    /// Reads `addr`.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors from the owning set.
    pub fn read(&mut self, addr: impl Into<Address>) -> Result<AccessOutcome> {
        self.access(AccessType::Read, addr)
    }

    /// Writes `addr`.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors from the owning set.
    pub fn write(&mut self, addr: impl Into<Address>) -> Result<AccessOutcome> {
        self.access(AccessType::Write, addr)
    }

    /// Routes one access to the set selected by the address.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors from the owning set.
    pub fn access(&mut self, op: AccessType, addr: impl Into<Address>) -> Result<AccessOutcome> {
        let addr = addr.into();
        let decoded = self.decoder.decode(addr);
        // The decoder reduces modulo n_sets, so the index is always in range.
        let set = &mut self.sets[decoded.set_index];
        let outcome = set.access(decoded.tag, op.dirty_status())?;
        trace!(
            op = %op,
            addr = %addr,
            set = decoded.set_index,
            tag = %decoded.tag,
            outcome = %outcome,
            "access"
        );
        Ok(outcome)
    }

    /// Parses `text` as an address and accesses it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidAddress`](crate::common::CacheError::InvalidAddress)
    /// for malformed text, otherwise as [`Cache::access`].
    pub fn access_str(&mut self, op: AccessType, text: &str) -> Result<AccessOutcome> {
        let addr = Address::parse(text)?;
        self.access(op, addr)
    }

    /// Returns `true` if the block holding `addr` is resident.
    pub fn contains(&self, addr: impl Into<Address>) -> bool {
        let decoded = self.decoder.decode(addr.into());
        self.sets
            .get(decoded.set_index)
            .is_some_and(|set| set.contains(decoded.tag))
    }

    /// Counters summed over every set.
    pub fn stats(&self) -> CacheStats {
        self.sets.iter().map(CacheStats::from_set).sum()
    }

    /// Static description of this cache.
    pub fn specs(&self) -> CacheSpecs {
        CacheSpecs {
            name: self.name.to_string(),
            policy: self
                .sets
                .first()
                .map_or("none", |set| set.policy().name())
                .to_string(),
            capacity_bytes: self.geometry.capacity_bytes(),
            block_size: self.geometry.block_size(),
            sets: self.geometry.n_sets(),
            ways: self.geometry.n_ways(),
            write_no_allocate: self.geometry.write_no_allocate(),
        }
    }

    /// Specs and counters in one report.
    pub fn report(&self) -> CacheReport {
        CacheReport::new(self.specs(), self.stats())
    }

    /// The cache's geometry.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The cache's address decoder.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// All sets, by index.
    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    /// The set at `index`, if any.
    pub fn set(&self, index: usize) -> Option<&Set> {
        self.sets.get(index)
    }
}

impl fmt::Display for Cache {
    /// One line per set: the hex set index padded to the index-field width,
    /// then ` : ` and the resident tags padded to the tag-field width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = (self.geometry.set_index_bits() / BITS_PER_HEX_DIGIT) as usize;
        let tag_width = (self.geometry.tag_bits() / BITS_PER_HEX_DIGIT) as usize;
        for (index, set) in self.sets.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<index_width$} : ", format!("{index:x}"))?;
            set.fmt_blocks(f, tag_width)?;
        }
        Ok(())
    }
}
