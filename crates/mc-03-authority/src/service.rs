//! # Authority Service
//!
//! Startup and the two background tasks around the engine: the seal driver
//! (interval trigger) and the persister (writes sealed blocks to the store
//! outside the engine lock).

use crate::config::AuthorityConfig;
use crate::domain::create_genesis;
use crate::engine::AuthorityEngine;
use crate::error::{AuthorityError, Result};
use crate::ports::{BlockSigner, Clock};
use mc_02_ledger::{Ledger, LedgerError, LedgerStore};
use shared_types::Block;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Load the chain from `store` and validate it, or create and save a signed
/// genesis if the store is empty.
pub fn bootstrap_ledger(
    store: &dyn LedgerStore,
    signer: &dyn BlockSigner,
    clock: &dyn Clock,
) -> Result<Ledger> {
    let blocks = store.load().map_err(LedgerError::from)?;

    if blocks.is_empty() {
        let genesis = create_genesis(signer, clock.now())?;
        store
            .save(std::slice::from_ref(&genesis))
            .map_err(LedgerError::from)?;
        let mut ledger = Ledger::new();
        ledger.append(genesis)?;
        return Ok(ledger);
    }

    let ledger = Ledger::from_blocks(blocks, &signer.public_key()).map_err(|e| {
        error!("[mc-03] Stored chain failed validation: {}", e);
        AuthorityError::Ledger(e)
    })?;
    info!("[mc-03] Resumed chain at height {}", ledger.len());
    Ok(ledger)
}

/// Persist sealed blocks in arrival order.
///
/// Runs on the blocking pool. Blocks that queue up while a save is in
/// flight are written together by the next save.
pub fn spawn_persister(
    store: Arc<dyn LedgerStore>,
    initial: Vec<Block>,
    mut sealed: mpsc::UnboundedReceiver<Block>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let mut blocks = initial;
        while let Some(block) = sealed.blocking_recv() {
            blocks.push(block);
            while let Ok(more) = sealed.try_recv() {
                blocks.push(more);
            }

            match store.save(&blocks) {
                Ok(()) => debug!("[mc-03] Persisted chain at height {}", blocks.len()),
                Err(e) => error!("[mc-03] Failed to persist chain: {}", e),
            }
        }
        info!("[mc-03] Persister stopped");
    })
}

/// Periodically seal once the block interval has passed.
///
/// Missed ticks are delayed rather than bursted. An empty pool on a tick is
/// the normal steady state and is only logged at debug.
pub fn spawn_seal_driver(
    engine: Arc<AuthorityEngine>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = engine.config().check_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        info!("[mc-03] Seal driver started (every {:?})", period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match engine.seal_if_due(engine.now()) {
                        Ok(Some(block)) => debug!("[mc-03] Interval sealed block {}", block.id),
                        Ok(None) => {}
                        Err(AuthorityError::NotEnoughTransactions) => {
                            debug!("[mc-03] Nothing to seal");
                        }
                        Err(e) => warn!("[mc-03] Interval seal failed: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[mc-03] Seal driver stopped");
    })
}

/// A running authority: engine plus its background tasks.
pub struct AuthorityHandle {
    pub engine: Arc<AuthorityEngine>,
    pub driver: JoinHandle<()>,
    pub persister: JoinHandle<()>,
}

impl AuthorityHandle {
    /// Bootstrap the ledger, build the engine and start both tasks.
    pub fn start(
        config: AuthorityConfig,
        signer: Arc<dyn BlockSigner>,
        clock: Arc<dyn Clock>,
        store: Arc<dyn LedgerStore>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let ledger = bootstrap_ledger(store.as_ref(), signer.as_ref(), clock.as_ref())?;
        let initial = ledger.blocks().to_vec();

        let engine = Arc::new(AuthorityEngine::new(config, signer, clock, ledger)?);
        let sealed = engine.subscribe_sealed();

        let persister = spawn_persister(store, initial, sealed);
        let driver = spawn_seal_driver(engine.clone(), shutdown);

        Ok(Self {
            engine,
            driver,
            persister,
        })
    }

    /// Wait for the driver to observe shutdown, then flush the persister.
    pub async fn join(self) {
        let Self {
            engine,
            driver,
            persister,
        } = self;

        if let Err(e) = driver.await {
            error!("[mc-03] Seal driver panicked: {}", e);
        }
        engine.close_sealed_stream();
        if let Err(e) = persister.await {
            error!("[mc-03] Persister panicked: {}", e);
        }
    }
}
