//! Address and Tag types.
//!
//! This module defines strong types for the values flowing through the cache model:
//! 1. **Addresses:** Raw byte addresses as they appear in a memory trace.
//! 2. **Tags:** The upper block-address bits that identify a block within one set.
//! 3. **Parsing:** Textual addresses with an optional base prefix (`0x`, `0o`, `0b`).

use std::fmt;
use std::str::FromStr;

use super::error::{CacheError, Result};

/// A byte address from a memory trace.
///
/// The cache treats memory as byte addressable; an `Address` is the byte
/// address of the accessed location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Parses a textual address.
    ///
    /// Accepts the same forms as an integer literal with base prefix:
    /// `0x` / `0X` for hexadecimal, `0o` / `0O` for octal, `0b` / `0B` for
    /// binary, and plain decimal otherwise. Surrounding whitespace and `_`
    /// digit separators are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidAddress`] if the text is not a valid
    /// unsigned integer in the selected base or does not fit in 64 bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesim_core::common::Address;
    ///
    /// assert_eq!(Address::parse("0xa2b").unwrap().val(), 0xa2b);
    /// assert_eq!(Address::parse("2603").unwrap().val(), 2603);
    /// assert!(Address::parse("0xzz").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let (digits, radix) = split_radix(trimmed);
        let digits: String = digits.chars().filter(|&c| c != '_').collect();
        if digits.is_empty() {
            return Err(CacheError::InvalidAddress(text.to_string()));
        }
        u64::from_str_radix(&digits, radix)
            .map(Self)
            .map_err(|_| CacheError::InvalidAddress(text.to_string()))
    }
}

/// Splits a base prefix off a textual integer, returning the digits and radix.
pub(crate) fn split_radix(text: &str) -> (&str, u32) {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (&text[2..], 16),
            b'o' | b'O' => return (&text[2..], 8),
            b'b' | b'B' => return (&text[2..], 2),
            _ => {}
        }
    }
    (text, 10)
}

impl FromStr for Address {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Block tag within one set.
///
/// Tags are only unique per set: the same tag value in two different sets
/// names two different blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u64);

impl Tag {
    /// Creates a new tag from a raw value.
    #[inline(always)]
    pub const fn new(tag: u64) -> Self {
        Self(tag)
    }

    /// Returns the raw tag value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Tag {
    /// Tags print as bare lowercase hex, the form used by the cache dump.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}
