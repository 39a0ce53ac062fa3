//! Scheduling of Neon EVM transactions on Solana.
//!
//! Ties the codec, EVM, and Solana crates together: resolves the signer's
//! nonce and the program parameters over JSON-RPC, derives the accounts,
//! encodes the scheduled transaction, and submits the signed instruction.
//! Token delegations to Neon contracts go through the same submitter.
//!
//! Logging goes through `tracing`; installing a subscriber is left to the
//! binary.

pub mod config;
pub mod error;
pub mod rpc;
pub mod submitter;

pub use config::{SchedulerConfig, DEV_TREASURY_AIRDROP_LAMPORTS};
pub use error::SchedulerError;
pub use rpc::{EvmParams, EvmRpc, JsonRpcClient, LedgerRpc, RpcError};
pub use submitter::{
    prepare, DelegateReceipt, DelegateRequest, PreparedSchedule, ScheduleContext,
    ScheduleReceipt, ScheduleRequest, ScheduleSubmitter,
};
