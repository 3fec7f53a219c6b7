//! # SHA-256 Hashing

use sha2::{Digest, Sha256};

/// SHA-256 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash the concatenation of several slices without allocating.
pub fn sha256_many(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Lowercase hex SHA-256 of an identifier such as an insurance number.
///
/// Used wherever a lookup key must not expose the identifier itself.
pub fn hash_identifier(identifier: &str) -> String {
    hex::encode(sha256(identifier.as_bytes()))
}
