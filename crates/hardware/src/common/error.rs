//! Cache model error definitions.
//!
//! Every error raised by the core is fatal for the current simulation run:
//! 1. **Configuration errors:** Geometry that cannot be decomposed into bit fields.
//! 2. **Invariant violations:** Classification or eviction states that must be unreachable.
//! 3. **Input errors:** Address text the decoder cannot interpret.
//!
//! None of these are transient, so callers report them and stop instead of retrying.

use thiserror::Error;

/// Convenient result alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors raised by the cache model.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The requested geometry cannot be built.
    ///
    /// Raised at construction for a non-power-of-two set count or block
    /// size, a zero capacity, or an address width above 64 bits.
    #[error("invalid cache geometry: {0}")]
    InvalidGeometry(String),

    /// `Set::access` reached a classification that the set invariants rule out.
    ///
    /// Also raised when an eviction policy's bookkeeping disagrees with the
    /// resident blocks of its set.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// Victim selection was requested on a set holding no resident block.
    #[error("victim selection requested on a set with no resident blocks")]
    EvictionOnEmptySet,

    /// An address token is not an unsigned integer in any accepted base.
    #[error("malformed address `{0}`")]
    InvalidAddress(String),
}
