//! # Authority Engine
//!
//! Admission and sealing over a single lock.

use crate::config::AuthorityConfig;
use crate::error::{AuthorityError, Result};
use crate::ports::{BlockSigner, Clock};
use mc_01_transaction_pool::{PoolError, TransactionPool};
use mc_02_ledger::{Ledger, LedgerError};
use parking_lot::Mutex;
use shared_crypto::Ed25519PublicKey;
use shared_types::{Block, EntityError, Transaction};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Result of a successful `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Added to the pool; `pending` is the pool size afterwards.
    Pooled { pending: usize },
    /// The submission filled the pool and this block was sealed.
    Sealed(Block),
}

struct EngineState {
    ledger: Ledger,
    pool: TransactionPool,
    last_seal_at: i64,
    sealed_tx: Option<mpsc::UnboundedSender<Block>>,
}

/// Single writer of the ledger.
pub struct AuthorityEngine {
    config: AuthorityConfig,
    signer: Arc<dyn BlockSigner>,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
}

impl AuthorityEngine {
    /// Engine over an already validated ledger.
    pub fn new(
        config: AuthorityConfig,
        signer: Arc<dyn BlockSigner>,
        clock: Arc<dyn Clock>,
        ledger: Ledger,
    ) -> Result<Self> {
        config.validate()?;
        let state = EngineState {
            last_seal_at: ledger.tail().map_or_else(|| clock.now(), |b| b.timestamp),
            ledger,
            pool: TransactionPool::new(config.pool_config()),
            sealed_tx: None,
        };

        info!("[mc-03] Initializing Authority Engine");
        info!("  Seal Threshold: {}", config.seal_threshold);
        info!("  Max Block Interval: {}s", config.max_block_interval_secs);

        Ok(Self {
            config,
            signer,
            clock,
            state: Mutex::new(state),
        })
    }

    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// Key every block is signed with.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.signer.public_key()
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Route every sealed block, in seal order, to the returned receiver.
    /// Replaces any previous subscriber.
    pub fn subscribe_sealed(&self) -> mpsc::UnboundedReceiver<Block> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().sealed_tx = Some(tx);
        rx
    }

    /// Drop the sealed-block sender so the subscriber drains and stops.
    pub fn close_sealed_stream(&self) {
        self.state.lock().sealed_tx = None;
    }

    /// Verify and admit a transaction, sealing if it fills the pool.
    ///
    /// # Errors
    /// - `InvalidTransaction` if the transaction is malformed, or its hash or
    ///   sender signature does not verify
    /// - `DuplicateTransaction` if the hash is pending or already confirmed
    /// - `PoolFull` if the pool is at capacity
    pub fn submit(&self, tx: Transaction) -> Result<SubmitOutcome> {
        if let Err(e) = tx.verify() {
            match &e {
                EntityError::InvalidSignature => warn!(
                    target: "security",
                    "[mc-03] Rejected transaction {} with forged sender signature",
                    tx.hash_hex()
                ),
                EntityError::MalformedTransaction(reason) => {
                    debug!("[mc-03] Rejected malformed transaction {}: {}", tx.hash_hex(), reason)
                }
                _ => {}
            }
            return Err(AuthorityError::InvalidTransaction(e.to_string()));
        }

        let key = tx.hash_hex();
        let mut state = self.state.lock();

        if state.ledger.contains_transaction(&key) {
            return Err(AuthorityError::DuplicateTransaction(key));
        }
        state.pool.add(tx).map_err(|e| match e {
            PoolError::DuplicateTransaction(hash) => AuthorityError::DuplicateTransaction(hash),
            PoolError::PoolFull { capacity } => AuthorityError::PoolFull { capacity },
        })?;
        debug!("[mc-03] Pooled transaction {}", key);

        if state.pool.len() >= self.config.seal_threshold {
            match self.seal_locked(&mut state) {
                Ok(block) => return Ok(SubmitOutcome::Sealed(block)),
                Err(e) => error!("[mc-03] Threshold seal failed, transactions kept: {}", e),
            }
        }

        Ok(SubmitOutcome::Pooled {
            pending: state.pool.len(),
        })
    }

    /// Seal every pending transaction into the next block.
    ///
    /// # Errors
    /// - `NotEnoughTransactions` if the pool is empty
    /// - `SignatureGenerationFailed` if the signer fails
    ///
    /// On any error the ledger is unchanged and the pool holds the same
    /// transactions in the same order.
    pub fn seal_block(&self) -> Result<Block> {
        let mut state = self.state.lock();
        self.seal_locked(&mut state)
    }

    /// Seal if the pool is at the threshold, or if `max_block_interval_secs`
    /// have passed since the last block and the pool is non-empty.
    pub fn seal_if_due(&self, now: i64) -> Result<Option<Block>> {
        let mut state = self.state.lock();
        let pending = state.pool.len();
        let elapsed = now.saturating_sub(state.last_seal_at);
        let interval = i64::try_from(self.config.max_block_interval_secs).unwrap_or(i64::MAX);

        let due = pending >= self.config.seal_threshold || (elapsed >= interval && pending > 0);
        if !due {
            return Ok(None);
        }
        self.seal_locked(&mut state).map(Some)
    }

    fn seal_locked(&self, state: &mut EngineState) -> Result<Block> {
        if state.pool.is_empty() {
            return Err(AuthorityError::NotEnoughTransactions);
        }

        let now = self.clock.now();
        let transactions = state.pool.drain_all();
        let previous_hash = state.ledger.tail().map(|b| b.hash);
        let id = state.ledger.next_id();
        let mut block = Block::with_timestamp(transactions, previous_hash, id, now);

        let signature = match self.signer.sign(&block.hash) {
            Ok(sig) => sig,
            Err(e) => {
                warn!(target: "security", "[mc-03] Block {} signing failed: {}", id, e);
                state.pool.restore(block.transactions);
                return Err(AuthorityError::SignatureGenerationFailed(e.to_string()));
            }
        };
        block.attach_signature(signature);

        if let Err(e) = state.ledger.append(block.clone()) {
            error!("[mc-03] Block {} append failed: {}", id, e);
            state.pool.restore(block.transactions);
            return Err(AuthorityError::Ledger(e));
        }
        state.last_seal_at = now;

        info!(
            "[mc-03] Sealed block {} with {} transactions ({})",
            block.id,
            block.transactions.len(),
            block.hash_hex()
        );

        if let Some(sender) = &state.sealed_tx {
            if sender.send(block.clone()).is_err() {
                warn!("[mc-03] Sealed-block subscriber gone; block {} not persisted", block.id);
                state.sealed_tx = None;
            }
        }

        Ok(block)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pool.len()
    }

    /// Pending transactions in drain order.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.lock().pool.snapshot()
    }

    pub fn height(&self) -> usize {
        self.state.lock().ledger.len()
    }

    /// Clone of the full chain.
    pub fn blocks(&self) -> Vec<Block> {
        self.state.lock().ledger.blocks().to_vec()
    }

    /// Blocks after `last_known`, or all blocks when `None`.
    pub fn blocks_after(&self, last_known: Option<&str>) -> std::result::Result<Vec<Block>, LedgerError> {
        self.state.lock().ledger.blocks_after(last_known)
    }

    /// Run a read-only closure against the ledger under the engine lock.
    /// The closure must not block.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.state.lock().ledger)
    }
}
