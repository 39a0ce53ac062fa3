//! SPL Token helpers used around scheduled transactions.
//!
//! Associated token account (ATA) derivation, the wrapped SOL mint, and the
//! `Approve` instruction that delegates token spending to a Neon contract,
//! all without the `spl-token` crates.

use neon_evm::Address;

use crate::accounts::{contract_account, named_account};
use crate::error::SolError;
use crate::pda::find_program_address;
use crate::transaction::{SolAccountMeta, SolInstruction};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
];

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
];

/// Wrapped SOL mint: `So11111111111111111111111111111111111111112`
pub const NATIVE_MINT: [u8; 32] = [
    0x06, 0x9b, 0x88, 0x57, 0xfe, 0xab, 0x81, 0x84, 0xfb, 0x68, 0x7f, 0x63, 0x46, 0x18, 0xc0, 0x35,
    0xda, 0xc4, 0x39, 0xdc, 0x1a, 0xeb, 0x3b, 0x55, 0x98, 0xa0, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// SPL Token `Approve` instruction index.
const APPROVE_IX_INDEX: u8 = 4;

/// Prefix of the named account a token contract delegates to outside of
/// scheduling.
const AUTH_PREFIX: &str = "AUTH";

// ---------------------------------------------------------------------------
// Associated Token Account
// ---------------------------------------------------------------------------

/// Derive the associated token account for an owner + mint pair.
///
/// Seeds: `[owner, token_program_id, mint]` under the ATA program. The owner
/// may itself be an off-curve PDA.
pub fn derive_associated_token_address(
    owner: &[u8; 32],
    mint: &[u8; 32],
) -> Result<[u8; 32], SolError> {
    find_program_address(
        &[owner.as_ref(), &TOKEN_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|pda| pda.address)
}

// ---------------------------------------------------------------------------
// Approve
// ---------------------------------------------------------------------------

/// Build an SPL Token `Approve` instruction.
///
/// Wire format: `[4]` followed by the u64 LE amount, 9 bytes in total.
/// An amount of zero is valid and revokes an existing allowance.
pub fn build_spl_approve(
    source_token_account: &[u8; 32],
    delegate: &[u8; 32],
    owner: &[u8; 32],
    amount: u64,
) -> SolInstruction {
    let mut data = Vec::with_capacity(9);
    data.push(APPROVE_IX_INDEX);
    data.extend_from_slice(&amount.to_le_bytes());

    SolInstruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*source_token_account),
            SolAccountMeta::readonly(*delegate),
            SolAccountMeta::readonly_signer(*owner),
        ],
        data,
    }
}

/// Who receives a token delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    /// The token contract's own account, so scheduled transactions can spend.
    Scheduling,
    /// The `"AUTH"` account of the token contract salted with an EVM delegate.
    Evm(Address),
}

/// The Solana account that should be approved as delegate for `token_contract`.
pub fn delegate_authority(
    program_id: &[u8; 32],
    token_contract: &Address,
    delegation: Delegation,
) -> Result<[u8; 32], SolError> {
    let pda = match delegation {
        Delegation::Scheduling => contract_account(program_id, token_contract)?,
        Delegation::Evm(delegate) => {
            named_account(program_id, AUTH_PREFIX, token_contract, &delegate)?
        }
    };
    Ok(pda.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::authority_pool_account;
    use crate::address::{parse_pubkey, pubkey_to_string};
    use crate::pda::is_on_curve;

    const PROGRAM: &str = "eeLSJgWzzxrqKv1UxtRVVH8FX3qCQWUs9QuAjJpETGU";

    // -- Constant verification ----------------------------------------------

    #[test]
    fn token_program_id_roundtrip() {
        assert_eq!(
            pubkey_to_string(&TOKEN_PROGRAM_ID),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }

    #[test]
    fn associated_token_program_id_roundtrip() {
        assert_eq!(
            pubkey_to_string(&ASSOCIATED_TOKEN_PROGRAM_ID),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
    }

    #[test]
    fn native_mint_roundtrip() {
        assert_eq!(
            pubkey_to_string(&NATIVE_MINT),
            "So11111111111111111111111111111111111111112"
        );
    }

    // -- ATA ----------------------------------------------------------------

    #[test]
    fn ata_is_off_curve_and_deterministic() {
        let owner = [0x11u8; 32];
        let a = derive_associated_token_address(&owner, &NATIVE_MINT).unwrap();
        let b = derive_associated_token_address(&owner, &NATIVE_MINT).unwrap();
        assert_eq!(a, b);
        assert!(!is_on_curve(&a));
    }

    #[test]
    fn ata_differs_per_mint() {
        let owner = [0xAAu8; 32];
        let a = derive_associated_token_address(&owner, &[0x01; 32]).unwrap();
        let b = derive_associated_token_address(&owner, &[0x02; 32]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn authority_pool_wsol_ata_fixture() {
        let program = parse_pubkey(PROGRAM).unwrap();
        let authority = authority_pool_account(&program).unwrap();
        let ata = derive_associated_token_address(&authority.address, &NATIVE_MINT).unwrap();
        assert_eq!(
            pubkey_to_string(&ata),
            "91SCrUVCitAgAqvKrPELEPQBWEQMNFWJeS8uyqfsduWY"
        );
    }

    // -- Approve ------------------------------------------------------------

    #[test]
    fn approve_data_encoding() {
        let ix = build_spl_approve(&[1; 32], &[2; 32], &[3; 32], 500_000);
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.data[0], 4);
        assert_eq!(u64::from_le_bytes(ix.data[1..9].try_into().unwrap()), 500_000);
        assert_eq!(ix.program_id, TOKEN_PROGRAM_ID);
    }

    #[test]
    fn approve_account_roles() {
        let ix = build_spl_approve(&[1; 32], &[2; 32], &[3; 32], 1);
        assert_eq!(ix.accounts.len(), 3);

        assert_eq!(ix.accounts[0].pubkey, [1; 32]);
        assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);

        assert_eq!(ix.accounts[1].pubkey, [2; 32]);
        assert!(!ix.accounts[1].is_writable && !ix.accounts[1].is_signer);

        assert_eq!(ix.accounts[2].pubkey, [3; 32]);
        assert!(ix.accounts[2].is_signer && !ix.accounts[2].is_writable);
    }

    #[test]
    fn approve_zero_amount_resets_allowance() {
        let ix = build_spl_approve(&[1; 32], &[2; 32], &[3; 32], 0);
        assert_eq!(ix.data, vec![4, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    // -- Delegation ---------------------------------------------------------

    #[test]
    fn scheduling_delegate_is_contract_account() {
        let program = parse_pubkey(PROGRAM).unwrap();
        let token = Address::repeat_byte(0x11);
        let delegate = delegate_authority(&program, &token, Delegation::Scheduling).unwrap();
        assert_eq!(
            pubkey_to_string(&delegate),
            "21fWmiik649Y51yRfVYRTzPXW9YhVfWP63s7gBfWYiBA"
        );
    }

    #[test]
    fn evm_delegate_is_auth_account() {
        let program = parse_pubkey(PROGRAM).unwrap();
        let token = Address::repeat_byte(0x11);
        let delegate = delegate_authority(
            &program,
            &token,
            Delegation::Evm(Address::repeat_byte(0x22)),
        )
        .unwrap();
        assert_eq!(
            pubkey_to_string(&delegate),
            "FziyDvV8wYU75t2tT4MzH32yoCbu5duVcxHv1AjvFdGs"
        );
    }
}
