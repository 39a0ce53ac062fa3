//! The scheduled-transaction instruction.
//!
//! ```text
//! accounts (fixed order):
//!   0 signer            signer, writable
//!   1 balance           writable
//!   2 treasury pool     writable
//!   3 tree              writable
//!   4 associated token  writable
//!   5 system program    read-only
//!
//! data:
//!   0x4A | treasury pool index u32 LE | scheduled transaction body
//! ```
//!
//! The receiving program addresses accounts by position, so the order above
//! is part of the wire contract.

use crate::error::SolError;
use crate::transaction::{SolAccountMeta, SolInstruction, SYSTEM_PROGRAM_ID};
use crate::treasury::TreasuryPool;

/// Instruction tag for "schedule transaction".
pub const SCHEDULE_TRANSACTION_TAG: u8 = 0x4A;

/// Number of accounts the instruction carries.
pub const SCHEDULE_ACCOUNT_COUNT: usize = 6;

const ROLE_NAMES: [&str; SCHEDULE_ACCOUNT_COUNT] = [
    "signer",
    "balance",
    "treasury pool",
    "tree",
    "associated token",
    "system program",
];

/// Resolved accounts for one scheduled transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleAccounts {
    pub signer: [u8; 32],
    pub balance: [u8; 32],
    pub treasury_pool: TreasuryPool,
    pub tree: [u8; 32],
    pub associated_token: [u8; 32],
}

impl ScheduleAccounts {
    /// Account metas in wire order.
    pub fn account_metas(&self) -> [SolAccountMeta; SCHEDULE_ACCOUNT_COUNT] {
        [
            SolAccountMeta::writable_signer(self.signer),
            SolAccountMeta::writable(self.balance),
            SolAccountMeta::writable(self.treasury_pool.address),
            SolAccountMeta::writable(self.tree),
            SolAccountMeta::writable(self.associated_token),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ]
    }
}

/// Instruction data: tag, LE32 pool index, body.
pub fn schedule_instruction_data(treasury_pool_index: u32, body: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + 4 + body.len());
    data.push(SCHEDULE_TRANSACTION_TAG);
    data.extend_from_slice(&treasury_pool_index.to_le_bytes());
    data.extend_from_slice(body);
    data
}

/// Build the instruction. Nothing is signed or sent here.
pub fn build_schedule_instruction(
    program_id: &[u8; 32],
    accounts: &ScheduleAccounts,
    body: &[u8],
) -> SolInstruction {
    SolInstruction {
        program_id: *program_id,
        accounts: accounts.account_metas().to_vec(),
        data: schedule_instruction_data(accounts.treasury_pool.index, body),
    }
}

/// Check that `ix` carries exactly the expected accounts, flags, and
/// header for `accounts`.
pub fn verify_account_order(
    ix: &SolInstruction,
    accounts: &ScheduleAccounts,
) -> Result<(), SolError> {
    let expected = accounts.account_metas();

    if ix.accounts.len() != expected.len() {
        return Err(SolError::InstructionBuildError(format!(
            "expected {} accounts, found {}",
            expected.len(),
            ix.accounts.len()
        )));
    }

    for (i, (got, want)) in ix.accounts.iter().zip(expected.iter()).enumerate() {
        if got != want {
            return Err(SolError::InstructionBuildError(format!(
                "account {i} should be the {} account",
                ROLE_NAMES[i]
            )));
        }
    }

    let header = schedule_instruction_data(accounts.treasury_pool.index, &[]);
    if !ix.data.starts_with(&header) {
        return Err(SolError::InstructionBuildError(
            "instruction data does not start with the schedule tag and pool index".into(),
        ));
    }

    Ok(())
}
