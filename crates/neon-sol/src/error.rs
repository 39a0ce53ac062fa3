use neon_codec::CodecError;
use thiserror::Error;

/// Solana-side derivation and transaction errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),

    /// No off-curve address exists for any bump. Never expected for
    /// well-formed seeds.
    #[error("no off-curve program address found for seeds")]
    DerivationExhausted,

    #[error("instruction build error: {0}")]
    InstructionBuildError(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
