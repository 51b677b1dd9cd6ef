//! Global Simulator Constants.
//!
//! Sizes and defaults shared by the configuration, the report formatter and the CLI.

/// Bytes in one KiB, the unit behind the `K` size suffix.
pub const KIB: u64 = 1024;

/// Bytes in one MiB, the unit behind the `M` size suffix.
pub const MIB: u64 = 1024 * 1024;

/// Representative trace address used when none is supplied.
///
/// Its eight hex digits give a 32-bit address width.
pub const DEFAULT_SAMPLE_ADDRESS: &str = "0xb7737f64";

/// Bits encoded by one hexadecimal digit.
pub const BITS_PER_HEX_DIGIT: u32 = 4;
