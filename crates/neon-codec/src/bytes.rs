//! Fixed-width integer, hex, and string encoders.
//!
//! Every seed segment and transaction field is built from these helpers, so
//! the width and byte order of each one is part of the wire contract:
//!
//! ```text
//! u32_to_bytes      4 bytes, LE or BE
//! u64_to_bytes_le   8 bytes, LE
//! u256_to_bytes_be 32 bytes, BE
//! minimal_be_bytes  BE with leading zeros stripped (RLP integers)
//! ```
//!
//! Range checks happen here, at the boundary, so encoders further down the
//! pipeline only ever see values that fit.

use alloy_primitives::U256;

use crate::error::CodecError;

/// Strips an optional `0x` / `0X` prefix.
fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

/// Decode a hex string into bytes.
///
/// The `0x` prefix is optional and digits are case-insensitive. `"0x"` and
/// `""` decode to an empty buffer.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CodecError> {
    let digits = strip_hex_prefix(hex);

    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidEncoding(format!(
            "non-hex character {bad:?} in {hex:?}"
        )));
    }

    hex::decode(digits).map_err(|e| CodecError::InvalidEncoding(format!("{hex:?}: {e}")))
}

/// Encode `value` as 4 bytes in the requested byte order.
pub fn u32_to_bytes(value: u64, little_endian: bool) -> Result<[u8; 4], CodecError> {
    let value = u32::try_from(value)
        .map_err(|_| CodecError::OutOfRange(format!("{value} does not fit u32")))?;

    Ok(if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    })
}

/// Encode `value` as 8 little-endian bytes.
pub fn u64_to_bytes_le(value: u128) -> Result<[u8; 8], CodecError> {
    let value = u64::try_from(value)
        .map_err(|_| CodecError::OutOfRange(format!("{value} does not fit u64")))?;
    Ok(value.to_le_bytes())
}

/// Encode a 256-bit value as 32 big-endian bytes.
///
/// Byte `i` holds bits `[(31 - i) * 8, (31 - i) * 8 + 8)`, most significant
/// byte first.
pub fn u256_to_bytes_be(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = value.byte(31 - i);
    }
    out
}

/// Decode 32 big-endian bytes into a 256-bit value.
pub fn u256_from_bytes_be(bytes: [u8; 32]) -> U256 {
    U256::from_be_bytes(bytes)
}

/// Parse a decimal or `0x`-prefixed hex integer into a `U256`.
///
/// Negative values and values of 2^256 or more are `OutOfRange`; anything
/// that is not a number at all is `InvalidEncoding`.
pub fn parse_u256(text: &str) -> Result<U256, CodecError> {
    let text = text.trim();

    if text.len() > 1 && text.starts_with('-') {
        return Err(CodecError::OutOfRange(format!(
            "{text} is negative, u256 must be >= 0"
        )));
    }

    let (digits, radix) = if text.starts_with("0x") || text.starts_with("0X") {
        (strip_hex_prefix(text), 16u32)
    } else {
        (text, 10u32)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(CodecError::InvalidEncoding(format!(
            "{text:?} is not a base-{radix} integer"
        )));
    }

    U256::from_str_radix(digits, u64::from(radix))
        .map_err(|_| CodecError::OutOfRange(format!("{text} exceeds 2^256 - 1")))
}

/// Project a string onto its UTF-8 bytes (no normalization).
pub fn utf8_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Left-pad `bytes` with zeros up to `total_len`.
pub fn zero_pad(bytes: &[u8], total_len: usize) -> Result<Vec<u8>, CodecError> {
    if bytes.len() > total_len {
        return Err(CodecError::InvalidLength {
            max: total_len,
            actual: bytes.len(),
        });
    }

    let mut out = vec![0u8; total_len - bytes.len()];
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Big-endian bytes of `value` with leading zero bytes stripped.
///
/// Zero encodes as an empty buffer.
pub fn minimal_be_bytes(value: u128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

/// Parse a JSON-RPC hex quantity such as `"0x1a"` into a `u64`.
///
/// Quantities may have an odd number of digits; `"0x"` and `"0x0"` are zero.
pub fn parse_hex_quantity(quantity: &str) -> Result<u64, CodecError> {
    let digits = strip_hex_prefix(quantity.trim());

    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidEncoding(format!(
            "non-hex character {bad:?} in quantity {quantity:?}"
        )));
    }
    if digits.is_empty() {
        return Ok(0);
    }

    u64::from_str_radix(digits, 16)
        .map_err(|_| CodecError::OutOfRange(format!("{quantity} does not fit u64")))
}
