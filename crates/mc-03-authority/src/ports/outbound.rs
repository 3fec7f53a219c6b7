//! Outbound ports (driven side)

use shared_crypto::{Ed25519PublicKey, Ed25519Signature, Hash};
use thiserror::Error;

/// Signer failure. Never carries key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("Signer unavailable: {0}")]
    Unavailable(String),
}

/// Produces authority signatures over block hashes.
pub trait BlockSigner: Send + Sync {
    /// Key blocks are validated against.
    fn public_key(&self) -> Ed25519PublicKey;

    /// Sign a 32-byte block hash.
    fn sign(&self, hash: &Hash) -> Result<Ed25519Signature, SignerError>;
}

/// Wall-clock source in epoch seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}
