//! # Shared Crypto - Envelope Encryption Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | AES-256-GCM | Record payload sealing |
//! | `key_wrap` | secp256k1 ECDH + HKDF-SHA256 | Wrapping the payload key for a patient |
//! | `signatures` | Ed25519 | Transaction and block signing |
//! | `hashing` | SHA-256 | Block/transaction hashes, identifier hashing |
//!
//! ## Security Properties
//!
//! - **AES-256-GCM**: fresh random 96-bit nonce per seal, authenticated
//! - **Key wrap**: ephemeral sender key per wrap, wrong recipient key always fails
//! - **Ed25519**: deterministic nonces, no RNG dependency
//! - Secret key types zeroize on drop and never print their bytes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod key_wrap;
pub mod signatures;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{hash_identifier, sha256, sha256_many, Hash};
pub use key_wrap::{unwrap_key, wrap_key, EncryptionKeyPair, EncryptionPublicKey, WrappedKey};
pub use signatures::{sign, verify, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use symmetric::{open, seal, Nonce, SymmetricKey, KEY_LEN, NONCE_LEN, TAG_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
