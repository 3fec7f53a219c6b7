//! # Client Node
//!
//! Read-only replica. Pulls blocks from the authority, validates them, and
//! appends them as one unit.

use crate::config::ClientSyncConfig;
use crate::domain::{SyncError, SyncRequest};
use crate::ports::AuthorityConnection;
use mc_02_ledger::Ledger;
use parking_lot::RwLock;
use shared_crypto::Ed25519PublicKey;
use shared_types::{Block, Transaction};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Client node service.
pub struct ClientNode {
    config: ClientSyncConfig,
    connection: Arc<dyn AuthorityConnection>,
    ledger: RwLock<Ledger>,
    authority_key: RwLock<Option<Ed25519PublicKey>>,
}

impl ClientNode {
    /// Client with an empty ledger; genesis arrives with the first sync.
    pub fn new(config: ClientSyncConfig, connection: Arc<dyn AuthorityConnection>) -> Self {
        Self {
            config,
            connection,
            ledger: RwLock::new(Ledger::new()),
            authority_key: RwLock::new(None),
        }
    }

    /// Client that trusts a key it already knows instead of asking for one.
    pub fn with_authority_key(
        config: ClientSyncConfig,
        connection: Arc<dyn AuthorityConnection>,
        key: Ed25519PublicKey,
    ) -> Self {
        let node = Self::new(config, connection);
        *node.authority_key.write() = Some(key);
        node
    }

    pub fn config(&self) -> &ClientSyncConfig {
        &self.config
    }

    pub fn authority_key(&self) -> Option<Ed25519PublicKey> {
        *self.authority_key.read()
    }

    /// Ask the authority for its signing key and remember it.
    pub async fn discover_authority(&self) -> Result<Ed25519PublicKey, SyncError> {
        let key = self.connection.fetch_public_key().await?;
        info!(
            "[mc-04] Authority {} signs with {}",
            self.connection.endpoint(),
            hex::encode(&key.as_bytes()[..4])
        );
        *self.authority_key.write() = Some(key);
        Ok(key)
    }

    async fn trusted_key(&self) -> Result<Ed25519PublicKey, SyncError> {
        match self.authority_key() {
            Some(key) => Ok(key),
            None => self.discover_authority().await,
        }
    }

    /// One sync round. Returns how many blocks were appended.
    ///
    /// The ledger lock is held only to read the tail and, after the network
    /// round trip, to validate and append.
    pub async fn sync_once(&self) -> Result<usize, SyncError> {
        let key = self.trusted_key().await?;

        let last = self.ledger.read().tail().map(|b| b.hash_hex());
        let request = match last {
            Some(hash) => SyncRequest::after(hash),
            None => SyncRequest::full(),
        };

        let response = self.connection.request_sync(request).await?;
        if response.blocks.is_empty() {
            debug!("[mc-04] Already up to date");
            return Ok(0);
        }

        let appended = self
            .ledger
            .write()
            .append_validated(response.blocks, &key)
            .map_err(|e| {
                warn!(target: "security", "[mc-04] Rejected blocks from authority: {}", e);
                SyncError::from(e)
            })?;

        info!(
            "[mc-04] Synced {} blocks, height now {}",
            appended,
            self.height()
        );
        Ok(appended)
    }

    /// Pass a transaction through to the authority.
    pub async fn forward_transaction(&self, tx: &Transaction) -> Result<(), SyncError> {
        self.connection.forward_transaction(tx).await?;
        debug!("[mc-04] Forwarded transaction {}", tx.hash_hex());
        Ok(())
    }

    pub fn height(&self) -> usize {
        self.ledger.read().len()
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.ledger.read().blocks().to_vec()
    }

    /// Run a read-only closure against the local ledger.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.ledger.read())
    }

    /// Sync every `sync_interval_secs` until `shutdown` flips to true.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.sync_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                "[mc-04] Client sync loop started against {}",
                self.connection.endpoint()
            );
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.sync_once().await {
                            warn!("[mc-04] Sync round failed: {}", e);
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("[mc-04] Client sync loop stopped");
        })
    }
}
