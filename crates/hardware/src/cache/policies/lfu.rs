//! Least Frequently Used (LFU) Eviction Policy.
//!
//! This policy evicts the resident block with the fewest accesses since it was
//! inserted. Ties go to the block inserted earliest among the tied ones.
//! An evicted tag forgets its count: if it returns, counting restarts at 1.

use std::collections::HashMap;

use super::EvictionPolicy;
use crate::cache::set::Block;
use crate::common::{CacheError, Result, Tag};

/// LFU policy state.
#[derive(Debug, Clone, Default)]
pub struct LfuPolicy {
    /// Accesses per resident tag.
    frequency: HashMap<Tag, u64>,
}

impl LfuPolicy {
    /// Creates an empty LFU policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access count recorded for `tag`, if it is tracked.
    pub fn frequency(&self, tag: Tag) -> Option<u64> {
        self.frequency.get(&tag).copied()
    }
}

impl EvictionPolicy for LfuPolicy {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn record_access(&mut self, tag: Tag) {
        *self.frequency.entry(tag).or_insert(0) += 1;
    }

    fn select_victim(&mut self, resident: &[Block]) -> Result<Tag> {
        // min_by_key keeps the first of equal minima, so ties follow insertion order.
        let victim = resident
            .iter()
            .map(|b| b.tag)
            .min_by_key(|tag| self.frequency.get(tag).copied().unwrap_or(0))
            .ok_or(CacheError::EvictionOnEmptySet)?;
        let _ = self.frequency.remove(&victim);
        Ok(victim)
    }

    fn tracks(&self, tag: Tag) -> bool {
        self.frequency.contains_key(&tag)
    }
}
