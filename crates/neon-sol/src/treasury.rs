//! Treasury pool selection.
//!
//! A pool is drawn uniformly at random for every scheduled transaction and
//! never cached: concurrent submissions may land on the same pool, which the
//! ledger tolerates.

use neon_codec::{random_index, random_index_with};
use rand::Rng;

use crate::accounts::treasury_pool_account;
use crate::error::SolError;

/// A selected treasury pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreasuryPool {
    /// Pool number in `[0, pool_count)`.
    pub index: u32,
    pub address: [u8; 32],
}

impl TreasuryPool {
    /// The pool account for `index`.
    pub fn derive(program_id: &[u8; 32], index: u32) -> Result<Self, SolError> {
        let pda = treasury_pool_account(program_id, index)?;
        Ok(Self {
            index,
            address: pda.address,
        })
    }
}

/// Uniform pool index in `[0, pool_count)`.
pub fn select_pool_index(pool_count: u32) -> Result<u32, SolError> {
    Ok(random_index(pool_count)?)
}

/// Select a pool and derive its address.
pub fn select_treasury_pool(
    program_id: &[u8; 32],
    pool_count: u32,
) -> Result<TreasuryPool, SolError> {
    TreasuryPool::derive(program_id, select_pool_index(pool_count)?)
}

/// [`select_treasury_pool`] with a caller-supplied RNG.
pub fn select_treasury_pool_with<R: Rng + ?Sized>(
    rng: &mut R,
    program_id: &[u8; 32],
    pool_count: u32,
) -> Result<TreasuryPool, SolError> {
    TreasuryPool::derive(program_id, random_index_with(rng, pool_count)?)
}
