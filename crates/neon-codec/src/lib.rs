//! # neon-codec
//!
//! Fixed-width byte encoders, hex parsing, and the random index source used
//! when building Neon scheduled transactions.

pub mod bytes;
pub mod error;
pub mod random;

pub use bytes::{
    hex_to_bytes, minimal_be_bytes, parse_hex_quantity, parse_u256, u256_from_bytes_be,
    u256_to_bytes_be, u32_to_bytes, u64_to_bytes_le, utf8_bytes, zero_pad,
};
pub use error::CodecError;
pub use random::{random_index, random_index_with};

/// 256-bit unsigned integer used for chain ids and other wide quantities.
pub use alloy_primitives::U256;
