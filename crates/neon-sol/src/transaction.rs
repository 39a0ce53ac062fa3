//! Legacy Solana transaction wire format and signing.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use ed25519_dalek::Signer;
use zeroize::Zeroize;

use crate::error::SolError;

/// The System Program public key: 32 zero bytes.
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// Largest serialized transaction the ledger accepts.
pub const PACKET_DATA_SIZE: usize = 1232;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

fn encode_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let len = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("{what} count {len} exceeds u16")))?;
    Ok(encode_compact_u16(len))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

impl SolAccountMeta {
    pub fn writable_signer(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: true,
            is_writable: true,
        }
    }

    pub fn readonly_signer(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: true,
            is_writable: false,
        }
    }

    pub fn writable(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: false,
        }
    }
}

/// An instruction before it is compiled into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled, unsigned transaction message.
#[derive(Debug, Clone)]
pub struct SolTransaction {
    /// All account keys in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<[u8; 32]>,

    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,

    pub recent_blockhash: [u8; 32],

    pub compiled_instructions: Vec<CompiledInstruction>,
}

/// An instruction with account references replaced by indices into
/// `account_keys`.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A signed transaction ready for `sendTransaction`.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Fee payer signature; its Base58 form is the transaction id.
    pub signature: [u8; 64],
    /// Full wire bytes.
    pub wire: Vec<u8>,
}

impl SignedTransaction {
    pub fn signature_base58(&self) -> String {
        bs58::encode(self.signature).into_string()
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile instructions into a message with a single fee payer.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    let mut entries: Vec<SolAccountMeta> = Vec::new();

    let mut upsert = |meta: SolAccountMeta| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == meta.pubkey) {
            entry.is_signer |= meta.is_signer;
            entry.is_writable |= meta.is_writable;
        } else {
            entries.push(meta);
        }
    };

    upsert(SolAccountMeta::writable_signer(*fee_payer));
    for ix in instructions {
        for meta in &ix.accounts {
            upsert(*meta);
        }
        upsert(SolAccountMeta::readonly(ix.program_id));
    }

    // Stable sort: the fee payer was inserted first and ranks first.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > usize::from(u8::MAX) {
        return Err(SolError::TransactionBuildError(format!(
            "{} accounts exceed the u8 index space",
            entries.len()
        )));
    }

    let count = |pred: fn(&SolAccountMeta) -> bool| entries.iter().filter(|e| pred(e)).count() as u8;
    let num_required_signatures = count(|e| e.is_signer);
    let num_readonly_signed = count(|e| e.is_signer && !e.is_writable);
    let num_readonly_unsigned = count(|e| !e.is_signer && !e.is_writable);

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &[u8; 32]| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError("account not in account keys".into()))
    };

    let compiled_instructions = instructions
        .iter()
        .map(|ix| {
            Ok(CompiledInstruction {
                program_id_index: index_of(&ix.program_id)?,
                account_indices: ix
                    .accounts
                    .iter()
                    .map(|meta| index_of(&meta.pubkey))
                    .collect::<Result<_, _>>()?,
                data: ix.data.clone(),
            })
        })
        .collect::<Result<Vec<_>, SolError>>()?;

    Ok(SolTransaction {
        account_keys,
        num_required_signatures,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions,
    })
}

/// Serialize the message (the bytes that get signed).
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(512);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&encode_len(tx.account_keys.len(), "account")?);
    for key in &tx.account_keys {
        buf.extend_from_slice(key);
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&encode_len(tx.compiled_instructions.len(), "instruction")?);
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&encode_len(ix.account_indices.len(), "account index")?);
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&encode_len(ix.data.len(), "data byte")?);
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Sign a single-signer message with a 32-byte Ed25519 seed and serialize
/// it to wire format.
pub fn sign_transaction(
    tx: &SolTransaction,
    private_key: &[u8; 32],
) -> Result<SignedTransaction, SolError> {
    if tx.num_required_signatures != 1 {
        return Err(SolError::TransactionBuildError(format!(
            "expected exactly one signer, message requires {}",
            tx.num_required_signatures
        )));
    }

    let message_bytes = serialize_message(tx)?;

    let mut seed = *private_key;
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
    seed.zeroize();

    if tx.account_keys.first() != Some(&signing_key.verifying_key().to_bytes()) {
        return Err(SolError::TransactionBuildError(
            "signing key is not the fee payer".into(),
        ));
    }

    let signature = signing_key.sign(&message_bytes).to_bytes();

    let mut wire = Vec::with_capacity(1 + 64 + message_bytes.len());
    wire.extend_from_slice(&encode_compact_u16(1));
    wire.extend_from_slice(&signature);
    wire.extend_from_slice(&message_bytes);

    if wire.len() > PACKET_DATA_SIZE {
        return Err(SolError::SerializationError(format!(
            "transaction is {} bytes, packet limit is {PACKET_DATA_SIZE}",
            wire.len()
        )));
    }

    Ok(SignedTransaction { signature, wire })
}
