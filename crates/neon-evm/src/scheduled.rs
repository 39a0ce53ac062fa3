//! Scheduled transaction body encoding.
//!
//! The receiving program parses the body as:
//!
//! ```text
//! 0x7F                      outer transaction type
//! 0x01                      scheduled subtype
//! rlp([
//!     payer, sender, nonce, index, intent, intent_call_data,
//!     target, call_data, value, chain_id, gas_limit,
//!     max_fee_per_gas, max_priority_fee_per_gas,
//! ])
//! ```
//!
//! Every element is an RLP byte string. Reserved elements are always the
//! empty string; the nonce is the empty string exactly when it is zero.

use alloy_primitives::Address;
use alloy_rlp::{Encodable, RlpEncodable};
use neon_codec::minimal_be_bytes;
use serde::{Deserialize, Serialize};

use crate::error::EvmError;

/// Outer transaction type byte.
pub const SCHEDULED_TX_TYPE: u8 = 0x7F;

/// Subtype byte for scheduled transactions.
pub const SCHEDULED_SUBTYPE: u8 = 0x01;

/// Largest call data accepted. A scheduled transaction travels inside a
/// single ledger packet, which is 1232 bytes.
pub const MAX_CALL_DATA_LEN: usize = 1232;

/// One RLP element of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field {
    /// Zero-length string (`0x80`).
    #[default]
    Empty,
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Field {
    /// Raw 20 address bytes.
    pub fn address(address: &Address) -> Self {
        Self::Bytes(address.as_slice().to_vec())
    }

    /// An integer quantity as minimal big-endian bytes. Zero is kept as a
    /// single `0x00` byte rather than collapsed to empty.
    pub fn quantity(value: u128) -> Self {
        if value == 0 {
            return Self::Bytes(vec![0x00]);
        }
        Self::Bytes(minimal_be_bytes(value))
    }

    /// The nonce element: empty when zero, minimal big-endian otherwise.
    pub fn nonce(nonce: u64) -> Self {
        if nonce == 0 {
            return Self::Empty;
        }
        Self::Bytes(minimal_be_bytes(u128::from(nonce)))
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Bytes(bytes) => bytes,
        }
    }
}

impl Encodable for Field {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

/// Gas parameters attached to every scheduled transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSettings {
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            gas_limit: 9_999_999,
            max_fee_per_gas: 50_000_000_000,
            max_priority_fee_per_gas: 10_000_000_000,
        }
    }
}

/// A scheduled transaction before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTransaction {
    /// EVM address paying for execution.
    pub payer: Address,
    /// Optional sender; currently always left empty by the scheduler.
    pub sender: Option<Address>,
    pub nonce: u64,
    /// Contract to call.
    pub target: Address,
    pub call_data: Vec<u8>,
    pub chain_id: u64,
    pub gas: GasSettings,
}

impl ScheduledTransaction {
    /// The ordered RLP elements of this transaction.
    fn fields(&self) -> ScheduledTxFields {
        ScheduledTxFields {
            payer: Field::address(&self.payer),
            sender: self.sender.as_ref().map(Field::address).unwrap_or_default(),
            nonce: Field::nonce(self.nonce),
            index: Field::Empty,
            intent: Field::Empty,
            intent_call_data: Field::Empty,
            target: Field::address(&self.target),
            call_data: Field::Bytes(self.call_data.clone()),
            value: Field::Empty,
            chain_id: Field::quantity(u128::from(self.chain_id)),
            gas_limit: Field::quantity(u128::from(self.gas.gas_limit)),
            max_fee_per_gas: Field::quantity(self.gas.max_fee_per_gas),
            max_priority_fee_per_gas: Field::quantity(self.gas.max_priority_fee_per_gas),
        }
    }

    /// Encodes the body as `0x7F || 0x01 || rlp(fields)`.
    pub fn encode(&self) -> Result<Vec<u8>, EvmError> {
        if self.call_data.len() > MAX_CALL_DATA_LEN {
            return Err(EvmError::InvalidField(format!(
                "call data is {} bytes, limit is {MAX_CALL_DATA_LEN}",
                self.call_data.len()
            )));
        }

        let fields = self.fields();
        let mut rlp_buf = Vec::with_capacity(fields.length());
        fields.encode(&mut rlp_buf);

        let mut body = Vec::with_capacity(2 + rlp_buf.len());
        body.push(SCHEDULED_TX_TYPE);
        body.push(SCHEDULED_SUBTYPE);
        body.extend_from_slice(&rlp_buf);

        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// RLP-encodable structure
// ---------------------------------------------------------------------------

/// Field order is the wire order.
#[derive(RlpEncodable)]
struct ScheduledTxFields {
    payer: Field,
    sender: Field,
    nonce: Field,
    index: Field,
    intent: Field,
    intent_call_data: Field,
    target: Field,
    call_data: Field,
    value: Field,
    chain_id: Field,
    gas_limit: Field,
    max_fee_per_gas: Field,
    max_priority_fee_per_gas: Field,
}
