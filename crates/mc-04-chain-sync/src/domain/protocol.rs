//! # Wire Messages

use serde::{Deserialize, Serialize};
use shared_crypto::Ed25519PublicKey;
use shared_types::Block;

/// Client → authority: "send me everything after this block".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Hex hash of the client's tail; absent or empty for a full sync.
    #[serde(default)]
    pub last_block_hash: Option<String>,
}

impl SyncRequest {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn after(hash_hex: impl Into<String>) -> Self {
        Self {
            last_block_hash: Some(hash_hex.into()),
        }
    }

    /// The hash to resume from, treating `""` as absent.
    pub fn resume_from(&self) -> Option<&str> {
        self.last_block_hash.as_deref().filter(|h| !h.is_empty())
    }
}

/// Authority → client: blocks in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub blocks: Vec<Block>,
}

/// Body of `GET /getPublicKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: Ed25519PublicKey,
}
