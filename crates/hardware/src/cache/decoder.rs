//! Address Decoder.
//!
//! Splits a byte address into the fields that route it through the cache.
//! From most to least significant bit an address reads `[ tag | set index | block offset ]`:
//!
//! ```text
//! block_address = address / block_size
//! set_index     = block_address % n_sets
//! tag           = block_address / n_sets
//! ```

use crate::common::{Address, Result, Tag};

/// The fields of one decoded address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddress {
    /// Tag identifying the block within its set.
    pub tag: Tag,
    /// Index of the set the block maps to.
    pub set_index: usize,
    /// Byte offset of the address inside its block.
    pub offset: u64,
}

/// Splits addresses into tag, set index and offset.
///
/// Built from a validated [`Geometry`](super::Geometry), so both divisors are
/// non-zero powers of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    block_size: u64,
    n_sets: u64,
}

impl AddressDecoder {
    pub(crate) const fn new(block_size: u64, n_sets: u64) -> Self {
        Self { block_size, n_sets }
    }

    /// Decodes a numeric address.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesim_core::cache::Geometry;
    /// use cachesim_core::common::{Address, Tag};
    ///
    /// let decoder = Geometry::new(16, 3, 1, 12).unwrap().decoder();
    /// let fields = decoder.decode(Address::new(0xa2b));
    /// assert_eq!(fields.set_index, 0xb);
    /// assert_eq!(fields.tag, Tag::new(0xa2));
    /// ```
    #[inline]
    pub const fn decode(&self, addr: Address) -> DecodedAddress {
        let block_address = addr.0 / self.block_size;
        DecodedAddress {
            tag: Tag(block_address / self.n_sets),
            set_index: (block_address % self.n_sets) as usize,
            offset: addr.0 % self.block_size,
        }
    }

    /// Decodes a textual address such as `0xb7737f64`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidAddress`](crate::common::CacheError::InvalidAddress)
    /// if the text is not an address.
    pub fn decode_str(&self, text: &str) -> Result<DecodedAddress> {
        Ok(self.decode(Address::parse(text)?))
    }

    /// Base byte address of the block holding `tag` in set `set_index`.
    ///
    /// The inverse of [`AddressDecoder::decode`] for offset zero.
    #[inline]
    pub const fn block_base(&self, tag: Tag, set_index: usize) -> Address {
        Address((tag.0 * self.n_sets + set_index as u64) * self.block_size)
    }
}
