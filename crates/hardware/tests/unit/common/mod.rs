/// Address parsing and decoding arithmetic.
pub mod address_arithmetic;
