//! Solana account addresses.
//!
//! An address is a Base58-encoded 32-byte value: either an Ed25519 public
//! key or an off-curve program derived address. No hashing is involved.

use crate::error::SolError;

/// Decode a Base58 address to its 32-byte representation.
pub fn parse_pubkey(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;

    Ok(arr)
}

/// Encode 32 bytes as a Base58 address.
pub fn pubkey_to_string(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}

/// The address as a `0x`-prefixed 32-byte hex word, the form EVM contracts
/// take Solana accounts in.
pub fn pubkey_to_bytes32_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
