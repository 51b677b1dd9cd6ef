//! Associative Set.
//!
//! One bucket of a set-associative cache. A set holds up to `n_ways` resident
//! blocks, classifies every access as a hit, cold miss or conflict miss, and
//! delegates victim choice to its own [`EvictionPolicy`].
//!
//! # Classification
//!
//! In priority order:
//! 1. **Hit:** the tag is resident.
//! 2. **Write-no-allocate bypass:** a write miss under write-no-allocate is
//!    counted (cold or conflict) but never installed.
//! 3. **Cold miss:** the tag was never seen in this set.
//! 4. **Conflict miss:** the tag was seen before but is no longer resident.
//!
//! # Memory
//!
//! The record of seen tags grows for the whole run and is never pruned. Telling
//! a cold miss from a conflict miss needs the full history, so this is the
//! price of the classification rather than a leak.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::policies::EvictionPolicy;
use crate::common::{AccessOutcome, CacheError, DirtyStatus, Result, Tag};

/// A resident block: its tag and whether it has been written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Tag of the resident block.
    pub tag: Tag,
    /// Dirty state of the resident block.
    pub dirty: DirtyStatus,
}

/// A fixed-capacity associative set with hit/miss classification.
#[derive(Debug)]
pub struct Set {
    capacity: usize,
    write_no_allocate: bool,
    /// Resident blocks in insertion order.
    blocks: Vec<Block>,
    /// Every tag ever installed or missed on in this set.
    seen: HashSet<Tag>,
    policy: Box<dyn EvictionPolicy>,
    access_count: u64,
    cold_miss_count: u64,
    conflict_miss_count: u64,
    eviction_count: u64,
    write_back_count: u64,
}

impl Set {
    /// Creates an empty set.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum resident blocks (the cache's ways).
    /// * `write_no_allocate` - Whether write misses bypass allocation.
    /// * `policy` - Eviction policy owned by this set alone.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`] for a zero capacity.
    pub fn new(
        capacity: usize,
        write_no_allocate: bool,
        policy: Box<dyn EvictionPolicy>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidGeometry(
                "set capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            capacity,
            write_no_allocate,
            blocks: Vec::with_capacity(capacity),
            seen: HashSet::new(),
            policy,
            access_count: 0,
            cold_miss_count: 0,
            conflict_miss_count: 0,
            eviction_count: 0,
            write_back_count: 0,
        })
    }

    /// Reads `tag` (clean access).
    ///
    /// # Errors
    ///
    /// See [`Set::access`].
    pub fn read(&mut self, tag: Tag) -> Result<AccessOutcome> {
        self.access(tag, DirtyStatus::Clean)
    }

    /// Writes `tag` (dirty access).
    ///
    /// # Errors
    ///
    /// See [`Set::access`].
    pub fn write(&mut self, tag: Tag) -> Result<AccessOutcome> {
        self.access(tag, DirtyStatus::Dirty)
    }

    /// Classifies one access and updates residency, counters and policy state.
    ///
    /// `access_count` grows by exactly one per call, whatever the outcome.
    /// A write hit marks the resident block dirty.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InternalInconsistency`] when a conflict miss finds free
    ///   capacity outside the write-no-allocate read case, or the policy's
    ///   bookkeeping disagrees with residency.
    /// - [`CacheError::EvictionOnEmptySet`] if eviction runs with nothing resident.
    pub fn access(&mut self, tag: Tag, dirty: DirtyStatus) -> Result<AccessOutcome> {
        self.access_count += 1;

        if let Some(block) = self.blocks.iter_mut().find(|b| b.tag == tag) {
            if dirty.is_dirty() {
                block.dirty = DirtyStatus::Dirty;
            }
            self.policy.record_access(tag);
            return Ok(AccessOutcome::Hit);
        }

        if self.write_no_allocate && dirty.is_dirty() {
            // Counted, but neither installed nor shown to the policy.
            return Ok(if self.seen.insert(tag) {
                self.cold_miss_count += 1;
                AccessOutcome::ColdMiss
            } else {
                self.conflict_miss_count += 1;
                AccessOutcome::ConflictMiss
            });
        }

        let outcome = if self.seen.insert(tag) {
            self.cold_miss_count += 1;
            if self.is_full() {
                self.evict_and_insert(tag, dirty)?;
            } else {
                self.blocks.push(Block { tag, dirty });
            }
            AccessOutcome::ColdMiss
        } else {
            self.conflict_miss_count += 1;
            if self.is_full() {
                self.evict_and_insert(tag, dirty)?;
            } else if self.write_no_allocate && !dirty.is_dirty() {
                // A bypassed write marked the tag seen without installing it,
                // so a later read can miss on it while the set has room.
                self.blocks.push(Block {
                    tag,
                    dirty: DirtyStatus::Clean,
                });
            } else {
                // Unreachable through `access`: a set only drops a block while
                // full and never shrinks, so a seen tag implies a full set.
                return Err(CacheError::InternalInconsistency(format!(
                    "conflict miss on tag 0x{tag} with {} of {} ways in use",
                    self.blocks.len(),
                    self.capacity
                )));
            }
            AccessOutcome::ConflictMiss
        };

        self.policy.record_access(tag);
        Ok(outcome)
    }

    /// Evicts the policy's victim and installs `tag` in its place.
    ///
    /// A dirty victim goes through the write-back hook first.
    ///
    /// # Errors
    ///
    /// Propagates the policy's victim-selection errors, and returns
    /// [`CacheError::InternalInconsistency`] if the victim is not resident.
    pub fn evict_and_insert(&mut self, tag: Tag, dirty: DirtyStatus) -> Result<()> {
        let victim = self.policy.select_victim(&self.blocks)?;
        let pos = self
            .blocks
            .iter()
            .position(|b| b.tag == victim)
            .ok_or_else(|| {
                CacheError::InternalInconsistency(format!(
                    "{} policy chose non-resident tag 0x{victim}",
                    self.policy.name()
                ))
            })?;
        let evicted = self.blocks.remove(pos);
        self.eviction_count += 1;
        debug!(
            victim = %evicted.tag,
            dirty = evicted.dirty.is_dirty(),
            incoming = %tag,
            policy = self.policy.name(),
            "evict"
        );
        if evicted.dirty.is_dirty() {
            self.write_back(evicted.tag);
        }
        self.blocks.push(Block { tag, dirty });
        Ok(())
    }

    /// Write-back hook for a dirty victim.
    ///
    /// Block contents are not modelled, so this only counts and logs.
    fn write_back(&mut self, tag: Tag) {
        self.write_back_count += 1;
        debug!(tag = %tag, "write back");
    }

    /// Returns `true` if `tag` is resident.
    pub fn contains(&self, tag: Tag) -> bool {
        self.blocks.iter().any(|b| b.tag == tag)
    }

    /// Dirty state of `tag`, or `None` if it is not resident.
    pub fn dirty_status(&self, tag: Tag) -> Option<DirtyStatus> {
        self.blocks.iter().find(|b| b.tag == tag).map(|b| b.dirty)
    }

    /// Returns `true` if `tag` was ever seen by this set.
    pub fn has_seen(&self, tag: Tag) -> bool {
        self.seen.contains(&tag)
    }

    /// Resident blocks in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of resident blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no block is resident.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns `true` when every way is occupied.
    pub fn is_full(&self) -> bool {
        self.blocks.len() == self.capacity
    }

    /// Maximum number of resident blocks.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The eviction policy owned by this set.
    pub fn policy(&self) -> &dyn EvictionPolicy {
        self.policy.as_ref()
    }

    /// Accesses handled so far.
    pub const fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Cold misses so far.
    pub const fn cold_miss_count(&self) -> u64 {
        self.cold_miss_count
    }

    /// Conflict misses so far.
    pub const fn conflict_miss_count(&self) -> u64 {
        self.conflict_miss_count
    }

    /// Hits so far.
    pub const fn hit_count(&self) -> u64 {
        self.access_count - self.cold_miss_count - self.conflict_miss_count
    }

    /// Evictions so far.
    pub const fn eviction_count(&self) -> u64 {
        self.eviction_count
    }

    /// Dirty evictions so far.
    pub const fn write_back_count(&self) -> u64 {
        self.write_back_count
    }

    /// Writes the resident tags padded to `tag_width` hex digits.
    ///
    /// Each entry is the hex tag followed by `*` when dirty (a space when
    /// clean), framed by single spaces.
    pub(crate) fn fmt_blocks(&self, f: &mut fmt::Formatter<'_>, tag_width: usize) -> fmt::Result {
        for block in &self.blocks {
            let marker = if block.dirty.is_dirty() { '*' } else { ' ' };
            let entry = format!("{}{marker}", block.tag);
            write!(f, " {entry:<width$} ", width = tag_width + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_blocks(f, 0)
    }
}
