use neon_codec::CodecError;
use neon_evm::EvmError;
use neon_sol::SolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// An RPC collaborator failed, timed out, or answered with garbage.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The ledger refused the transaction. The message is the ledger's own.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Evm(#[from] EvmError),

    #[error(transparent)]
    Sol(#[from] SolError),
}
