//! # Outbound Ports
//!
//! How a client node reaches the authority.

use crate::domain::{SyncError, SyncRequest, SyncResponse};
use async_trait::async_trait;
use shared_crypto::Ed25519PublicKey;
use shared_types::Transaction;

/// Authority connection - outbound port.
#[async_trait]
pub trait AuthorityConnection: Send + Sync {
    /// Fetch the key blocks are signed with.
    async fn fetch_public_key(&self) -> Result<Ed25519PublicKey, SyncError>;

    /// Request blocks after the given hash.
    async fn request_sync(&self, request: SyncRequest) -> Result<SyncResponse, SyncError>;

    /// Hand a signed transaction to the authority for admission.
    async fn forward_transaction(&self, tx: &Transaction) -> Result<(), SyncError>;

    /// Endpoint identifier (for logging).
    fn endpoint(&self) -> &str;
}
