//! Random Eviction Policy.
//!
//! This policy evicts a uniformly random resident block. The random source is
//! an explicit dependency: pass any [`RngCore`] to [`RandomPolicy::new`], or
//! use [`RandomPolicy::seeded`] for reproducible runs.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::EvictionPolicy;
use crate::cache::set::Block;
use crate::common::{CacheError, Result, Tag};

/// Random policy state: only the random source.
#[derive(Debug, Clone)]
pub struct RandomPolicy<R = StdRng> {
    rng: R,
}

impl<R: RngCore> RandomPolicy<R> {
    /// Creates a random policy drawing from `rng`.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPolicy<StdRng> {
    /// Creates a reproducible random policy from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Creates a random policy seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: RngCore + std::fmt::Debug + Send> EvictionPolicy for RandomPolicy<R> {
    fn name(&self) -> &'static str {
        "random"
    }

    /// Access patterns do not affect the state.
    fn record_access(&mut self, _tag: Tag) {}

    fn select_victim(&mut self, resident: &[Block]) -> Result<Tag> {
        if resident.is_empty() {
            return Err(CacheError::EvictionOnEmptySet);
        }
        let idx = self.rng.random_range(0..resident.len());
        Ok(resident[idx].tag)
    }

    fn tracks(&self, _tag: Tag) -> bool {
        false
    }
}
