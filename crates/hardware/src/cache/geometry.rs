//! Cache Geometry.
//!
//! The immutable shape of a cache, fixed at construction:
//! 1. **Dimensions:** Number of sets, ways per set and block size.
//! 2. **Bit Fields:** Widths of the tag, set-index and block-offset fields.
//! 3. **Write Policy:** Whether write misses allocate.
//!
//! The field widths satisfy `address_bits = tag_bits + set_index_bits + block_offset_bits`.
//! They only drive formatting; decoding uses plain division and modulo.

use crate::common::addr::split_radix;
use crate::common::constants::BITS_PER_HEX_DIGIT;
use crate::common::{Address, CacheError, Result};

use super::decoder::AddressDecoder;

/// Validated, immutable cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    n_sets: usize,
    n_ways: usize,
    block_size: u64,
    address_bits: u32,
    write_no_allocate: bool,
}

impl Geometry {
    /// Creates a write-allocate geometry.
    ///
    /// # Arguments
    ///
    /// * `n_sets` - Number of sets; must be a power of two.
    /// * `n_ways` - Blocks per set; must be non-zero.
    /// * `block_size` - Block size in bytes; must be a power of two.
    /// * `address_bits` - Address width; at most 64. A width too narrow for
    ///   the offset and index fields is widened to hold them, so the tag field
    ///   is never negative.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`] when any of the constraints
    /// above does not hold.
    pub fn new(n_sets: usize, n_ways: usize, block_size: u64, address_bits: u32) -> Result<Self> {
        if n_sets == 0 || !n_sets.is_power_of_two() {
            return Err(CacheError::InvalidGeometry(format!(
                "n_sets = {n_sets} is not a power of two"
            )));
        }
        if block_size == 0 || !block_size.is_power_of_two() {
            return Err(CacheError::InvalidGeometry(format!(
                "block_size = {block_size} is not a power of two"
            )));
        }
        if n_ways == 0 {
            return Err(CacheError::InvalidGeometry("n_ways must be at least 1".into()));
        }
        if address_bits > u64::BITS {
            return Err(CacheError::InvalidGeometry(format!(
                "address width of {address_bits} bits exceeds {} bits",
                u64::BITS
            )));
        }
        // Widths only pad the dump, so a narrow sample widens instead of failing.
        let fixed_bits = block_size.trailing_zeros() + n_sets.trailing_zeros();
        let address_bits = address_bits.max(fixed_bits);
        Ok(Self {
            n_sets,
            n_ways,
            block_size,
            address_bits,
            write_no_allocate: false,
        })
    }

    /// Returns a copy with the given write-miss policy.
    #[must_use]
    pub const fn with_write_no_allocate(mut self, write_no_allocate: bool) -> Self {
        self.write_no_allocate = write_no_allocate;
        self
    }

    /// Derives the address width from a representative trace address.
    ///
    /// A hexadecimal sample counts four bits per digit, leading zeros
    /// included, so `0x00ff` gives 16. Any other sample gives the bit width
    /// of its value (at least 1).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidAddress`] if `sample` does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesim_core::cache::Geometry;
    ///
    /// assert_eq!(Geometry::address_bits_from_sample("0xb7737f64").unwrap(), 32);
    /// assert_eq!(Geometry::address_bits_from_sample("0xb00").unwrap(), 12);
    /// assert_eq!(Geometry::address_bits_from_sample("255").unwrap(), 8);
    /// ```
    pub fn address_bits_from_sample(sample: &str) -> Result<u32> {
        let value = Address::parse(sample)?;
        let (digits, radix) = split_radix(sample.trim());
        if radix == 16 {
            let count = digits.chars().filter(|&c| c != '_').count() as u32;
            return Ok((count * BITS_PER_HEX_DIGIT).min(u64::BITS));
        }
        Ok((u64::BITS - value.val().leading_zeros()).max(1))
    }

    /// Number of sets.
    #[inline]
    pub const fn n_sets(&self) -> usize {
        self.n_sets
    }

    /// Blocks per set.
    #[inline]
    pub const fn n_ways(&self) -> usize {
        self.n_ways
    }

    /// Block size in bytes.
    #[inline]
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Address width in bits.
    #[inline]
    pub const fn address_bits(&self) -> u32 {
        self.address_bits
    }

    /// Whether write misses bypass allocation.
    #[inline]
    pub const fn write_no_allocate(&self) -> bool {
        self.write_no_allocate
    }

    /// Width of the byte-offset-in-block field.
    #[inline]
    pub const fn block_offset_bits(&self) -> u32 {
        self.block_size.trailing_zeros()
    }

    /// Width of the set-index field.
    #[inline]
    pub const fn set_index_bits(&self) -> u32 {
        self.n_sets.trailing_zeros()
    }

    /// Width of the tag field.
    #[inline]
    pub const fn tag_bits(&self) -> u32 {
        self.address_bits - self.block_offset_bits() - self.set_index_bits()
    }

    /// Total data capacity in bytes.
    pub const fn capacity_bytes(&self) -> u64 {
        self.n_sets as u64 * self.n_ways as u64 * self.block_size
    }

    /// Decoder splitting addresses for this geometry.
    pub const fn decoder(&self) -> AddressDecoder {
        AddressDecoder::new(self.block_size, self.n_sets as u64)
    }
}
