//! First-In, First-Out (FIFO) Eviction Policy.
//!
//! This policy evicts the block that has been resident the longest, regardless
//! of how recently it was accessed. Hits never reorder the queue.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `record_access()`: O(W) where W is the number of ways
//!   - `select_victim()`: O(W²) worst case, O(W) when bookkeeping matches residency
//! - **Space Complexity:** O(W) per set
//! - **Best Case:** Streaming accesses where all blocks have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict hot blocks)

use std::collections::VecDeque;

use super::EvictionPolicy;
use crate::cache::set::Block;
use crate::common::{CacheError, Result, Tag};

/// FIFO policy state.
#[derive(Debug, Clone, Default)]
pub struct FifoPolicy {
    /// Resident tags in insertion order (front = oldest).
    queue: VecDeque<Tag>,
}

impl FifoPolicy {
    /// Creates an empty FIFO policy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvictionPolicy for FifoPolicy {
    fn name(&self) -> &'static str {
        "fifo"
    }

    /// Appends `tag` the first time it becomes resident; repeat hits are ignored.
    fn record_access(&mut self, tag: Tag) {
        if !self.queue.contains(&tag) {
            self.queue.push_back(tag);
        }
    }

    /// Returns the oldest resident tag and drops it from the queue.
    fn select_victim(&mut self, resident: &[Block]) -> Result<Tag> {
        if resident.is_empty() {
            return Err(CacheError::EvictionOnEmptySet);
        }
        let pos = self
            .queue
            .iter()
            .position(|tag| resident.iter().any(|b| b.tag == *tag))
            .ok_or_else(|| {
                CacheError::InternalInconsistency("FIFO queue holds no resident tag".into())
            })?;
        self.queue
            .remove(pos)
            .ok_or_else(|| CacheError::InternalInconsistency("FIFO queue index out of range".into()))
    }

    fn tracks(&self, tag: Tag) -> bool {
        self.queue.contains(&tag)
    }
}
