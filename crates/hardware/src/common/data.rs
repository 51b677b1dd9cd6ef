//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the simulator:
//! 1. **Trace Operations:** Reads and writes as they appear in a memory trace (`R` / `W`).
//! 2. **Block State:** Whether a resident block is clean or has been written (dirty).
//! 3. **Outcomes:** How the cache classified a single access (hit, cold miss, conflict miss).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Data read access (`R` in a trace).
    Read,

    /// Data write access (`W` in a trace).
    ///
    /// Brings the block in dirty, unless the cache uses write-no-allocate
    /// and the block is not resident.
    Write,
}

impl AccessType {
    /// Dirty status a block receives when installed or touched by this access.
    #[inline]
    pub const fn dirty_status(self) -> DirtyStatus {
        match self {
            Self::Read => DirtyStatus::Clean,
            Self::Write => DirtyStatus::Dirty,
        }
    }

    /// Trace mnemonic for this access.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Read => "R",
            Self::Write => "W",
        }
    }
}

impl FromStr for AccessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" | "r" => Ok(Self::Read),
            "W" | "w" => Ok(Self::Write),
            other => Err(format!("unknown access type `{other}`")),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Whether a resident block has been written since it was loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirtyStatus {
    /// Unmodified since load.
    #[default]
    Clean,
    /// Written since load; would be written back on eviction.
    Dirty,
}

impl DirtyStatus {
    /// Returns `true` for [`DirtyStatus::Dirty`].
    #[inline]
    pub const fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }
}

/// Classification of one access by its set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AccessOutcome {
    /// The tag was resident.
    Hit,
    /// First access to this tag in its set.
    ColdMiss,
    /// The tag was seen before in its set but is no longer resident.
    ConflictMiss,
}

impl AccessOutcome {
    /// Returns `true` for either kind of miss.
    #[inline]
    pub const fn is_miss(self) -> bool {
        !matches!(self, Self::Hit)
    }
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hit => "hit",
            Self::ColdMiss => "cold miss",
            Self::ConflictMiss => "conflict miss",
        })
    }
}
