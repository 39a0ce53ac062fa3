//! Solana-side support for Neon scheduled transactions.
//!
//! This crate derives the program-owned accounts Neon EVM expects, builds
//! the schedule instruction, picks a treasury pool, and compiles and signs
//! the surrounding legacy transaction without pulling in `solana-sdk`.
//!
//! The wire format is implemented by hand, using `ed25519-dalek` for
//! signing, `curve25519-dalek` for the off-curve check, and `bs58` for
//! addresses.

pub mod accounts;
pub mod address;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod spl_token;
pub mod transaction;
pub mod treasury;

pub use accounts::{
    authority_pool_account, balance_account, contract_account, named_account, tree_account,
    treasury_pool_account,
};
pub use address::{parse_pubkey, pubkey_to_bytes32_hex, pubkey_to_string};
pub use error::SolError;
pub use instruction::{
    build_schedule_instruction, verify_account_order, ScheduleAccounts, SCHEDULE_TRANSACTION_TAG,
};
pub use pda::{create_program_address, find_program_address, is_on_curve, ProgramAddress};
pub use spl_token::{
    build_spl_approve, delegate_authority, derive_associated_token_address, Delegation,
    ASSOCIATED_TOKEN_PROGRAM_ID, NATIVE_MINT, TOKEN_PROGRAM_ID,
};
pub use transaction::{
    compile_transaction, encode_compact_u16, serialize_message, sign_transaction,
    CompiledInstruction, SignedTransaction, SolAccountMeta, SolInstruction, SolTransaction,
    PACKET_DATA_SIZE, SYSTEM_PROGRAM_ID,
};
pub use treasury::{select_pool_index, select_treasury_pool, select_treasury_pool_with, TreasuryPool};
