//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Address Types:** Strong types for trace addresses and per-set tags.
//! 2. **Constants:** Size units and the default sample address.
//! 3. **Memory Access:** Read/write classification, block dirty state and access outcomes.
//! 4. **Error Handling:** The fatal error taxonomy of the cache model.

/// Address and tag type definitions.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types for the cache model.
pub mod error;

pub use addr::{Address, Tag};
pub use data::{AccessOutcome, AccessType, DirtyStatus};
pub use error::{CacheError, Result};
