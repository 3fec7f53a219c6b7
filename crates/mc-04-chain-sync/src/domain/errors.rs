//! # Sync Errors

use mc_02_ledger::{LedgerError, ValidationError};
use thiserror::Error;

/// Chain sync errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Requested hash is not part of the serving chain.
    #[error("Unknown block: {0}")]
    UnknownBlock(String),

    /// Received blocks failed validation; nothing was appended.
    #[error("Received blocks rejected: {0}")]
    Validation(#[from] ValidationError),

    /// Connection, timeout or other transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Authority answered with a non-success status.
    #[error("Authority rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Authority answered with an unreadable body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<LedgerError> for SyncError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Validation(v) => Self::Validation(v),
            LedgerError::UnknownBlock(h) => Self::UnknownBlock(h),
            LedgerError::Store(s) => Self::Transport(s.to_string()),
        }
    }
}
