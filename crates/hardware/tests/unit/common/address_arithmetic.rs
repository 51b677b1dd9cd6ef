//! Address Arithmetic Tests.
//!
//! Verifies textual address parsing and the tag / set-index / offset split
//! for power-of-two geometries.

use cachesim_core::cache::Geometry;
use cachesim_core::common::{Address, Tag};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("0xa2b", 0xa2b)]
#[case("0XA2B", 0xa2b)]
#[case("2603", 2603)]
#[case("0o5053", 0o5053)]
#[case("0b1010_0010_1011", 0xa2b)]
#[case(" 0xb7737f64\n", 0xb773_7f64)]
fn parses_textual_addresses(#[case] text: &str, #[case] expected: u64) {
    assert_eq!(Address::parse(text).unwrap(), Address(expected));
    assert_eq!(text.trim().parse::<Address>().unwrap(), Address(expected));
}

#[rstest]
#[case("")]
#[case("R")]
#[case("0xg1")]
#[case("12abc")]
#[case("18446744073709551616")]
fn rejects_malformed_addresses(#[case] text: &str) {
    assert!(Address::parse(text).is_err());
}

/// The decoder places the tag above the set index above the offset.
#[test]
fn decode_matches_bit_layout() {
    // 64 sets of 1 KiB blocks: offset = bits 0..10, index = bits 10..16.
    let decoder = Geometry::new(64, 16, 1024, 32).unwrap().decoder();
    let fields = decoder.decode(Address(0xb773_7f64));
    assert_eq!(fields.offset, 0x364);
    assert_eq!(fields.set_index, 0x1f);
    assert_eq!(fields.tag, Tag(0xb773));
}

/// Text and integer forms of the same address decode identically.
#[test]
fn decode_str_agrees_with_decode() {
    let decoder = Geometry::new(16, 3, 1, 12).unwrap().decoder();
    assert_eq!(decoder.decode_str("0xa40").unwrap(), decoder.decode(Address(0xa40)));
    assert_eq!(decoder.decode_str("2624").unwrap(), decoder.decode(Address(0xa40)));
}

proptest! {
    /// Division/modulo decoding equals shifting and masking for powers of two.
    #[test]
    fn decode_equals_bit_slicing(
        addr in any::<u32>(),
        set_bits in 0u32..12,
        offset_bits in 0u32..12,
    ) {
        let geometry = Geometry::new(1 << set_bits, 1, 1 << offset_bits, 32).unwrap();
        let fields = geometry.decoder().decode(Address(u64::from(addr)));
        let addr = u64::from(addr);
        prop_assert_eq!(fields.offset, addr & ((1 << offset_bits) - 1));
        prop_assert_eq!(fields.set_index as u64, (addr >> offset_bits) & ((1 << set_bits) - 1));
        prop_assert_eq!(fields.tag, Tag(addr >> (offset_bits + set_bits)));
    }

    /// Reassembling a decoded address from its fields gives it back.
    #[test]
    fn block_base_plus_offset_restores_address(addr in any::<u64>(), set_bits in 0u32..16) {
        let decoder = Geometry::new(1 << set_bits, 1, 64, 64).unwrap().decoder();
        let fields = decoder.decode(Address(addr));
        let base = decoder.block_base(fields.tag, fields.set_index);
        prop_assert_eq!(base.val() + fields.offset, addr);
    }
}
