use alloy_primitives::Address;
use neon_codec::{hex_to_bytes, zero_pad};
use sha3::{Digest, Keccak256};

use crate::error::EvmError;

/// Parses a 20-byte EVM address from hex.
///
/// The `0x` prefix is optional and no checksum is enforced: the address is
/// only ever used as raw seed and field bytes.
pub fn parse_address(hex: &str) -> Result<Address, EvmError> {
    let bytes = hex_to_bytes(hex)?;

    let raw: [u8; 20] = bytes.try_into().map_err(|v: Vec<u8>| {
        EvmError::InvalidAddress(format!("expected 20 bytes, got {}", v.len()))
    })?;

    Ok(Address::from(raw))
}

/// The EVM payer address controlled by a Solana account.
///
/// Last 20 bytes of `keccak256(pubkey)`, the same way an Ethereum address is
/// taken from a public key hash.
pub fn payer_for_solana_key(pubkey: &[u8; 32]) -> Address {
    let hash = Keccak256::digest(pubkey);

    let mut raw = [0u8; 20];
    raw.copy_from_slice(&hash[12..]);
    Address::from(raw)
}

/// Left-pads an address to a 32-byte word.
pub fn address_to_bytes32(address: &Address) -> Result<[u8; 32], EvmError> {
    let padded = zero_pad(address.as_slice(), 32)?;

    padded.try_into().map_err(|v: Vec<u8>| {
        EvmError::InvalidAddress(format!("expected 32 padded bytes, got {}", v.len()))
    })
}
