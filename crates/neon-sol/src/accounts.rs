//! Neon EVM account address families.
//!
//! Each family is a fixed seed layout under the Neon EVM program id. The
//! `*_seeds` functions return the exact seed segments so the layout can be
//! checked on its own; the matching `*_account` functions run the PDA search.
//!
//! ```text
//! contract        [0x03, address(20)]
//! balance         [0x03, wallet(20), chain_id u256 BE(32)]
//! tree            [0x03, "TREE", wallet(20), chain_id u64 LE(8), nonce u64 LE(8)]
//! authority pool  ["Deposit"]
//! treasury pool   ["treasury_pool", index u32 LE(4)]
//! named           [0x03, prefix, contract(20), 12 zero bytes ++ salt(20)]
//! ```

use neon_codec::{u256_to_bytes_be, u32_to_bytes, u64_to_bytes_le, utf8_bytes, zero_pad, U256};
use neon_evm::Address;

use crate::error::SolError;
use crate::pda::{find_program_address, ProgramAddress};

/// Version byte leading the account seeds.
pub const ACCOUNT_SEED_VERSION: u8 = 0x03;

const TREE_TAG: &str = "TREE";
const AUTHORITY_POOL_TAG: &str = "Deposit";
const TREASURY_POOL_TAG: &str = "treasury_pool";

/// A seed list, one owned buffer per segment.
pub type Seeds = Vec<Vec<u8>>;

fn derive(seeds: &[Vec<u8>], program_id: &[u8; 32]) -> Result<ProgramAddress, SolError> {
    let refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
    find_program_address(&refs, program_id)
}

/// Seeds: `[version, contract]`.
pub fn contract_account_seeds(contract: &Address) -> Seeds {
    vec![vec![ACCOUNT_SEED_VERSION], contract.as_slice().to_vec()]
}

/// Account holding a deployed contract's state.
pub fn contract_account(
    program_id: &[u8; 32],
    contract: &Address,
) -> Result<ProgramAddress, SolError> {
    derive(&contract_account_seeds(contract), program_id)
}

/// Seeds: `[version, wallet, chain_id as 32-byte BE]`.
pub fn balance_account_seeds(wallet: &Address, chain_id: u64) -> Seeds {
    vec![
        vec![ACCOUNT_SEED_VERSION],
        wallet.as_slice().to_vec(),
        u256_to_bytes_be(U256::from(chain_id)).to_vec(),
    ]
}

/// Per-chain balance account of an EVM wallet.
pub fn balance_account(
    program_id: &[u8; 32],
    wallet: &Address,
    chain_id: u64,
) -> Result<ProgramAddress, SolError> {
    derive(&balance_account_seeds(wallet, chain_id), program_id)
}

/// Seeds: `[version, "TREE", wallet, chain_id LE64, nonce LE64]`.
pub fn tree_account_seeds(wallet: &Address, chain_id: u64, nonce: u64) -> Result<Seeds, SolError> {
    Ok(vec![
        vec![ACCOUNT_SEED_VERSION],
        utf8_bytes(TREE_TAG),
        wallet.as_slice().to_vec(),
        u64_to_bytes_le(u128::from(chain_id))?.to_vec(),
        u64_to_bytes_le(u128::from(nonce))?.to_vec(),
    ])
}

/// Per-nonce record tracking one scheduled transaction.
pub fn tree_account(
    program_id: &[u8; 32],
    wallet: &Address,
    chain_id: u64,
    nonce: u64,
) -> Result<ProgramAddress, SolError> {
    derive(&tree_account_seeds(wallet, chain_id, nonce)?, program_id)
}

/// Seeds: `["Deposit"]`.
pub fn authority_pool_seeds() -> Seeds {
    vec![utf8_bytes(AUTHORITY_POOL_TAG)]
}

/// The program's deposit authority.
pub fn authority_pool_account(program_id: &[u8; 32]) -> Result<ProgramAddress, SolError> {
    derive(&authority_pool_seeds(), program_id)
}

/// Seeds: `["treasury_pool", index LE32]`.
pub fn treasury_pool_seeds(index: u32) -> Result<Seeds, SolError> {
    Ok(vec![
        utf8_bytes(TREASURY_POOL_TAG),
        u32_to_bytes(u64::from(index), true)?.to_vec(),
    ])
}

/// Treasury pool account number `index`.
pub fn treasury_pool_account(
    program_id: &[u8; 32],
    index: u32,
) -> Result<ProgramAddress, SolError> {
    derive(&treasury_pool_seeds(index)?, program_id)
}

/// Seeds: `[version, prefix, contract, salt zero-padded to 32]`.
pub fn named_account_seeds(
    prefix: &str,
    contract: &Address,
    salt: &Address,
) -> Result<Seeds, SolError> {
    Ok(vec![
        vec![ACCOUNT_SEED_VERSION],
        utf8_bytes(prefix),
        contract.as_slice().to_vec(),
        zero_pad(salt.as_slice(), 32)?,
    ])
}

/// A contract-owned account keyed by a string prefix and a 20-byte salt,
/// e.g. the `"AUTH"` delegate of a token contract.
pub fn named_account(
    program_id: &[u8; 32],
    prefix: &str,
    contract: &Address,
    salt: &Address,
) -> Result<ProgramAddress, SolError> {
    derive(&named_account_seeds(prefix, contract, salt)?, program_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{parse_pubkey, pubkey_to_string};
    use crate::error::SolError;

    const PROGRAM: &str = "eeLSJgWzzxrqKv1UxtRVVH8FX3qCQWUs9QuAjJpETGU";
    const CHAIN_ID: u64 = 245_022_926;

    fn program() -> [u8; 32] {
        parse_pubkey(PROGRAM).unwrap()
    }

    fn wallet() -> Address {
        Address::repeat_byte(0x11)
    }

    // -- seed layouts -----------------------------------------------------------

    #[test]
    fn contract_seed_layout() {
        let seeds = contract_account_seeds(&wallet());
        assert_eq!(seeds, vec![vec![0x03], vec![0x11; 20]]);
    }

    #[test]
    fn balance_seed_layout() {
        let seeds = balance_account_seeds(&wallet(), CHAIN_ID);
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0], vec![0x03]);
        assert_eq!(seeds[1], vec![0x11; 20]);
        assert_eq!(seeds[2].len(), 32);
        assert_eq!(&seeds[2][..28], &[0u8; 28]);
        assert_eq!(&seeds[2][28..], &[0x0e, 0x9a, 0xc0, 0xce]);
    }

    #[test]
    fn tree_seed_layout() {
        let seeds = tree_account_seeds(&wallet(), CHAIN_ID, 5).unwrap();
        assert_eq!(seeds[0], vec![0x03]);
        assert_eq!(seeds[1], b"TREE".to_vec());
        assert_eq!(seeds[2], vec![0x11; 20]);
        assert_eq!(seeds[3], vec![0xce, 0xc0, 0x9a, 0x0e, 0, 0, 0, 0]);
        assert_eq!(seeds[4], vec![5, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn authority_pool_seed_layout() {
        assert_eq!(authority_pool_seeds(), vec![b"Deposit".to_vec()]);
    }

    #[test]
    fn treasury_pool_seed_layout() {
        let seeds = treasury_pool_seeds(0x0102).unwrap();
        assert_eq!(seeds, vec![b"treasury_pool".to_vec(), vec![0x02, 0x01, 0, 0]]);
    }

    #[test]
    fn named_seed_layout() {
        let salt = Address::repeat_byte(0x22);
        let seeds = named_account_seeds("AUTH", &wallet(), &salt).unwrap();
        assert_eq!(seeds[0], vec![0x03]);
        assert_eq!(seeds[1], b"AUTH".to_vec());
        assert_eq!(seeds[2], vec![0x11; 20]);
        assert_eq!(&seeds[3][..12], &[0u8; 12]);
        assert_eq!(&seeds[3][12..], &[0x22; 20]);
    }

    // -- golden addresses ---------------------------------------------------------

    fn assert_fixture(pda: ProgramAddress, expected: &str, bump: u8) {
        assert_eq!(pubkey_to_string(&pda.address), expected);
        assert_eq!(pda.bump, bump);
    }

    #[test]
    fn contract_account_fixture() {
        let pda = contract_account(&program(), &wallet()).unwrap();
        assert_fixture(pda, "21fWmiik649Y51yRfVYRTzPXW9YhVfWP63s7gBfWYiBA", 254);
    }

    #[test]
    fn balance_account_fixture() {
        let pda = balance_account(&program(), &wallet(), CHAIN_ID).unwrap();
        assert_fixture(pda, "oJGAXN6oeaMsjAoQsMhSYv8dRo57Hge29Z5S1oHS6Rf", 254);
    }

    #[test]
    fn tree_account_fixture() {
        let pda = tree_account(&program(), &wallet(), CHAIN_ID, 0).unwrap();
        assert_fixture(pda, "23Li7N4YpC1xSwb7yQx8wtjyWrhy6mTkjXBbNKGN8Pdi", 254);

        let pda = tree_account(&program(), &wallet(), CHAIN_ID, 5).unwrap();
        assert_fixture(pda, "7A2HFctXz6G9udrLkWEcXAFbVRtXzqseBoUXsz85iFKT", 254);
    }

    #[test]
    fn authority_pool_fixture() {
        let pda = authority_pool_account(&program()).unwrap();
        assert_fixture(pda, "GGU2oXoJZurAQW6yeR5pVYSzD2HdgKo7Yo2shjPpPf2K", 252);
    }

    #[test]
    fn treasury_pool_fixture() {
        let pda = treasury_pool_account(&program(), 0).unwrap();
        assert_fixture(pda, "7pkQPYbBB7STPwymXkXsTwaKANgvLn6YFGT4Lqp8dYus", 255);

        let pda = treasury_pool_account(&program(), 7).unwrap();
        assert_fixture(pda, "DQymknxxm1TUYtsDu5UzWHPiDETtSUfhtsdyRAZLGTdL", 255);
    }

    #[test]
    fn named_account_fixture() {
        let salt = Address::repeat_byte(0x22);
        let pda = named_account(&program(), "AUTH", &wallet(), &salt).unwrap();
        assert_fixture(pda, "FziyDvV8wYU75t2tT4MzH32yoCbu5duVcxHv1AjvFdGs", 254);
    }

    // -- properties ---------------------------------------------------------------

    #[test]
    fn balance_account_is_deterministic() {
        let a = balance_account(&program(), &wallet(), CHAIN_ID).unwrap();
        let b = balance_account(&program(), &wallet(), CHAIN_ID).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn balance_account_depends_on_chain_id() {
        let a = balance_account(&program(), &wallet(), CHAIN_ID).unwrap();
        let b = balance_account(&program(), &wallet(), CHAIN_ID + 1).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn tree_account_depends_on_nonce() {
        let zero = tree_account(&program(), &wallet(), CHAIN_ID, 0).unwrap();
        let five = tree_account(&program(), &wallet(), CHAIN_ID, 5).unwrap();
        assert_ne!(zero.address, five.address);
    }

    #[test]
    fn treasury_pools_differ_by_index() {
        let a = treasury_pool_account(&program(), 1).unwrap();
        let b = treasury_pool_account(&program(), 2).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn overlong_prefix_is_rejected_before_hashing() {
        let prefix = "P".repeat(33);
        let err = named_account(&program(), &prefix, &wallet(), &wallet()).unwrap_err();
        assert!(matches!(err, SolError::InvalidSeeds(_)));
    }
}
