use thiserror::Error;

/// Byte codec errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("invalid length: expected at most {max} bytes, got {actual}")]
    InvalidLength { max: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
