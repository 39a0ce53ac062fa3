use neon_codec::CodecError;
use thiserror::Error;

/// EVM-side encoding errors.
#[derive(Debug, Error)]
pub enum EvmError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
