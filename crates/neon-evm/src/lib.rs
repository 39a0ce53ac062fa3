//! EVM-side support for Neon scheduled transactions.
//!
//! This crate provides:
//! - 20-byte EVM address parsing and the payer address of a Solana key
//! - The scheduled transaction body (`0x7F 0x01 || rlp(fields)`)
//! - Default gas settings used when scheduling

pub mod address;
pub mod error;
pub mod scheduled;

pub use address::{address_to_bytes32, parse_address, payer_for_solana_key};
pub use error::EvmError;
pub use scheduled::{
    Field, GasSettings, ScheduledTransaction, MAX_CALL_DATA_LEN, SCHEDULED_SUBTYPE,
    SCHEDULED_TX_TYPE,
};

pub use alloy_primitives::Address;
