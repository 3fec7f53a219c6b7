//! # Error Types

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors raised while building, signing or checking ledger entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// Stored hash does not match the recomputed canonical hash.
    #[error("Hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: String, computed: String },

    /// Entity carries no signature.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature does not verify under the expected key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// A sealed value, wrapped key or recipient has the wrong shape.
    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    /// Key pair used to sign is not the transaction's declared sender.
    #[error("Signer does not match sender identity")]
    SignerMismatch,

    /// Transaction has no wrapped key, so nobody can open its payload.
    #[error("Missing wrapped key")]
    MissingWrappedKey,

    /// Decrypted bytes are not a medical record.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Underlying crypto failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
