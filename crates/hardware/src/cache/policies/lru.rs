//! Least Recently Used (LRU) Eviction Policy.
//!
//! This policy evicts the block that has not been touched for the longest time.
//! It keeps a recency list per set: every hit or insert moves the tag to the
//! back (most recently used); the front is the least recently used tag.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `record_access()`: O(W) where W is the number of ways
//!   - `select_victim()`: O(W) when bookkeeping matches residency
//! - **Space Complexity:** O(W) per set
//! - **Best Case:** Workloads with good temporal locality
//! - **Worst Case:** Cyclic scans larger than the set (thrashing)

use std::collections::VecDeque;

use super::EvictionPolicy;
use crate::cache::set::Block;
use crate::common::{CacheError, Result, Tag};

/// LRU policy state.
#[derive(Debug, Clone, Default)]
pub struct LruPolicy {
    /// Front is least recently used, back is most recently used.
    recency: VecDeque<Tag>,
}

impl LruPolicy {
    /// Creates an empty LRU policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags from least to most recently used.
    pub fn recency_order(&self) -> impl Iterator<Item = Tag> + '_ {
        self.recency.iter().copied()
    }
}

impl EvictionPolicy for LruPolicy {
    fn name(&self) -> &'static str {
        "lru"
    }

    /// Moves `tag` to the most recently used position.
    fn record_access(&mut self, tag: Tag) {
        if let Some(pos) = self.recency.iter().position(|&t| t == tag) {
            let _ = self.recency.remove(pos);
        }
        self.recency.push_back(tag);
    }

    /// Returns the least recently used resident tag and drops it from the list.
    fn select_victim(&mut self, resident: &[Block]) -> Result<Tag> {
        if resident.is_empty() {
            return Err(CacheError::EvictionOnEmptySet);
        }
        let pos = self
            .recency
            .iter()
            .position(|tag| resident.iter().any(|b| b.tag == *tag))
            .ok_or_else(|| {
                CacheError::InternalInconsistency("LRU list holds no resident tag".into())
            })?;
        self.recency
            .remove(pos)
            .ok_or_else(|| CacheError::InternalInconsistency("LRU list index out of range".into()))
    }

    fn tracks(&self, tag: Tag) -> bool {
        self.recency.contains(&tag)
    }
}
