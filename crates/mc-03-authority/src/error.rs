//! Error types for the authority engine

use mc_02_ledger::LedgerError;
use thiserror::Error;

/// Result type alias for authority operations
pub type Result<T> = std::result::Result<T, AuthorityError>;

/// Errors that can occur while admitting or sealing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    /// Seal requested on an empty pool
    #[error("Not enough transactions to seal a block")]
    NotEnoughTransactions,

    /// Authority signer failed; drained transactions were restored
    #[error("Signature generation failed: {0}")]
    SignatureGenerationFailed(String),

    /// Hash already pending or already confirmed
    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(String),

    /// Hash or sender signature does not verify
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Pool at capacity
    #[error("Transaction pool full at {capacity}")]
    PoolFull {
        /// Configured capacity
        capacity: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Ledger append, validation or persistence failure
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
