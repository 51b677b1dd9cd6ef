//! Cache Eviction Policies.
//!
//! Implements the algorithms that pick a victim block when a full set must
//! make room for a new one.
//!
//! # Policies
//!
//! - `Random`: Uniformly random resident block, from an injected random source.
//! - `Fifo`: First-In, First-Out.
//! - `Lru`: Least Recently Used.
//! - `Lfu`: Least Frequently Used.
//!
//! Each [`Set`](super::Set) owns its own policy instance; no state is shared
//! between sets.

/// First-In, First-Out eviction policy.
pub mod fifo;

/// Least Frequently Used eviction policy.
pub mod lfu;

/// Least Recently Used eviction policy.
pub mod lru;

/// Random eviction policy.
pub mod random;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;

use super::set::Block;
use crate::common::{Result, Tag};
use crate::config::ReplacementPolicy;

/// Trait for set eviction policies.
///
/// Defines the interface for per-access bookkeeping and victim selection.
/// The owning set calls [`EvictionPolicy::record_access`] after every hit
/// and every allocating miss, and never for a write miss that bypasses
/// allocation.
pub trait EvictionPolicy: fmt::Debug + Send {
    /// Short lowercase name of the policy.
    fn name(&self) -> &'static str;

    /// Updates the policy state after `tag` was hit or inserted.
    ///
    /// # Arguments
    ///
    /// * `tag` - The resident tag that was just accessed.
    fn record_access(&mut self, tag: Tag);

    /// Selects the victim to evict from a full set.
    ///
    /// The chosen tag is dropped from the policy's bookkeeping; the caller
    /// removes it from residency.
    ///
    /// # Arguments
    ///
    /// * `resident` - The blocks currently resident in the set, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EvictionOnEmptySet`](crate::common::CacheError::EvictionOnEmptySet)
    /// when `resident` is empty, and
    /// [`CacheError::InternalInconsistency`](crate::common::CacheError::InternalInconsistency)
    /// when the bookkeeping holds no resident tag.
    fn select_victim(&mut self, resident: &[Block]) -> Result<Tag>;

    /// Returns `true` if `tag` currently appears in the policy's bookkeeping.
    fn tracks(&self, tag: Tag) -> bool;
}

/// Builds the policy instance for one set.
///
/// # Arguments
///
/// * `policy` - Which algorithm to build.
/// * `seed` - Seed for the random policy; `None` draws one from the operating system.
pub fn build_policy(policy: ReplacementPolicy, seed: Option<u64>) -> Box<dyn EvictionPolicy> {
    match policy {
        ReplacementPolicy::Random => match seed {
            Some(seed) => Box::new(RandomPolicy::seeded(seed)),
            None => Box::new(RandomPolicy::from_os_rng()),
        },
        ReplacementPolicy::Fifo => Box::new(FifoPolicy::new()),
        ReplacementPolicy::Lru => Box::new(LruPolicy::new()),
        ReplacementPolicy::Lfu => Box::new(LfuPolicy::new()),
    }
}
