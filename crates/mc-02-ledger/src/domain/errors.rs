//! # Domain Errors
//!
//! Every validation error names the block it was raised for.

use thiserror::Error;

/// Block or chain validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Stored hash does not match the canonical hash.
    #[error("Block {block_id}: hash mismatch")]
    InvalidHash { block_id: u64 },

    /// Authority signature missing or wrong.
    #[error("Block {block_id}: invalid authority signature")]
    InvalidSignature { block_id: u64 },

    /// Id or `previous_hash` does not follow the preceding block.
    #[error("Block {block_id}: linkage mismatch ({reason})")]
    LinkageMismatch { block_id: u64, reason: String },

    /// A contained transaction fails its own hash or signature check.
    #[error("Block {block_id}: invalid transaction {tx_hash} ({reason})")]
    InvalidTransaction {
        block_id: u64,
        tx_hash: String,
        reason: String,
    },
}

impl ValidationError {
    /// Id of the offending block.
    pub fn block_id(&self) -> u64 {
        match self {
            Self::InvalidHash { block_id }
            | Self::InvalidSignature { block_id }
            | Self::LinkageMismatch { block_id, .. }
            | Self::InvalidTransaction { block_id, .. } => *block_id,
        }
    }
}

/// Persistence adapter failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Ledger operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Hash is not in the index.
    #[error("Unknown block: {0}")]
    UnknownBlock(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
