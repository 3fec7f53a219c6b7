//! # Transaction Pool - Arrival-Ordered Map
//!
//! ## Data Structures
//!
//! - `by_hash`: O(1) lookup by hex hash
//! - `order`: arrival sequence → hex hash, drained front to back
//!
//! New arrivals take increasing sequence numbers from `next_seq`. Restored
//! transactions take decreasing numbers below `front_seq`, so they drain
//! before anything that arrived while they were out of the pool.

use super::config::PoolConfig;
use super::errors::PoolError;
use shared_types::Transaction;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct PooledTransaction {
    seq: i64,
    tx: Transaction,
}

/// Pending transactions awaiting a block.
#[derive(Debug)]
pub struct TransactionPool {
    config: PoolConfig,
    by_hash: HashMap<String, PooledTransaction>,
    order: BTreeMap<i64, String>,
    next_seq: i64,
    front_seq: i64,
}

impl TransactionPool {
    /// Creates a new empty transaction pool.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            by_hash: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            front_seq: 0,
        }
    }

    /// Creates a pool with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PoolConfig::default())
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Checks if a transaction exists in the pool.
    pub fn contains(&self, hash_hex: &str) -> bool {
        self.by_hash.contains_key(hash_hex)
    }

    pub fn get(&self, hash_hex: &str) -> Option<&Transaction> {
        self.by_hash.get(hash_hex).map(|p| &p.tx)
    }

    /// Adds a transaction to the back of the pool.
    ///
    /// # Errors
    /// - `DuplicateTransaction` if the hash is already pending
    /// - `PoolFull` if at capacity
    pub fn add(&mut self, tx: Transaction) -> Result<(), PoolError> {
        let key = tx.hash_hex();
        if self.by_hash.contains_key(&key) {
            return Err(PoolError::DuplicateTransaction(key));
        }

        if let Some(capacity) = self.config.max_pool_size {
            if self.by_hash.len() >= capacity {
                return Err(PoolError::PoolFull { capacity });
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.insert(seq, key, tx);
        Ok(())
    }

    fn insert(&mut self, seq: i64, key: String, tx: Transaction) {
        self.order.insert(seq, key.clone());
        self.by_hash.insert(key, PooledTransaction { seq, tx });
    }

    /// Removes one transaction, returning it if it was pending.
    pub fn remove(&mut self, hash_hex: &str) -> Option<Transaction> {
        let pooled = self.by_hash.remove(hash_hex)?;
        self.order.remove(&pooled.seq);
        Some(pooled.tx)
    }

    /// Removes every pending transaction, oldest first.
    pub fn drain_all(&mut self) -> Vec<Transaction> {
        let order = std::mem::take(&mut self.order);
        let mut drained = Vec::with_capacity(order.len());
        for key in order.into_values() {
            if let Some(pooled) = self.by_hash.remove(&key) {
                drained.push(pooled.tx);
            }
        }
        debug!("[mc-01] Drained {} transactions", drained.len());
        drained
    }

    /// Puts previously drained transactions back at the front, keeping their
    /// relative order.
    ///
    /// Capacity is not enforced here: these transactions were already
    /// admitted once. A hash that was re-submitted while the batch was out is
    /// kept once, at the restored position.
    pub fn restore(&mut self, txs: Vec<Transaction>) {
        let count = txs.len();
        for tx in txs.into_iter().rev() {
            let key = tx.hash_hex();
            if self.remove(&key).is_some() {
                warn!("[mc-01] Restored transaction {} was also re-submitted", key);
            }
            self.front_seq -= 1;
            self.insert(self.front_seq, key, tx);
        }
        debug!("[mc-01] Restored {} transactions to pool front", count);
    }

    /// Pending transactions in drain order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.order
            .values()
            .filter_map(move |key| self.by_hash.get(key).map(|p| &p.tx))
    }

    /// Cloned pending transactions in drain order.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.iter().cloned().collect()
    }
}

impl Default for TransactionPool {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_crypto::{Ed25519KeyPair, EncryptionKeyPair};
    use shared_types::Payload;

    fn make_tx(n: u8) -> Transaction {
        let doctor = Ed25519KeyPair::from_seed([1u8; 32]);
        let patient = EncryptionKeyPair::from_slice(&[2u8; 32]).unwrap();
        let mut tx = Transaction::with_timestamp(
            Payload::Sealed {
                ciphertext: vec![n; 20],
                nonce: vec![0; 12],
            },
            doctor.public_key(),
            patient.public_key(),
            None,
            1_700_000_000,
        );
        tx.sign(&doctor).unwrap();
        tx
    }

    fn hashes(txs: &[Transaction]) -> Vec<String> {
        txs.iter().map(|t| t.hash_hex()).collect()
    }

    #[test]
    fn test_add_and_contains() {
        let mut pool = TransactionPool::with_defaults();
        let tx = make_tx(1);
        let key = tx.hash_hex();

        pool.add(tx).unwrap();
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&key));
        assert!(pool.get(&key).is_some());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut pool = TransactionPool::with_defaults();
        pool.add(make_tx(1)).unwrap();

        let result = pool.add(make_tx(1));
        assert!(matches!(result, Err(PoolError::DuplicateTransaction(_))));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_pool_full() {
        let mut pool = TransactionPool::new(PoolConfig {
            max_pool_size: Some(2),
        });
        pool.add(make_tx(1)).unwrap();
        pool.add(make_tx(2)).unwrap();

        assert_eq!(pool.add(make_tx(3)), Err(PoolError::PoolFull { capacity: 2 }));
    }

    #[test]
    fn test_unbounded_pool() {
        let mut pool = TransactionPool::new(PoolConfig::unbounded());
        for n in 0..50 {
            pool.add(make_tx(n)).unwrap();
        }
        assert_eq!(pool.len(), 50);
    }

    #[test]
    fn test_drain_all_in_arrival_order() {
        let mut pool = TransactionPool::with_defaults();
        let txs: Vec<_> = (0..5).map(make_tx).collect();
        for tx in txs.clone() {
            pool.add(tx).unwrap();
        }

        let drained = pool.drain_all();
        assert_eq!(hashes(&drained), hashes(&txs));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut pool = TransactionPool::with_defaults();
        let tx = make_tx(9);
        let key = tx.hash_hex();
        pool.add(tx).unwrap();
        pool.add(make_tx(10)).unwrap();

        assert!(pool.remove(&key).is_some());
        assert!(pool.remove(&key).is_none());
        assert_eq!(pool.snapshot().len(), 1);
    }

    #[test]
    fn test_restore_goes_ahead_of_newer_arrivals() {
        let mut pool = TransactionPool::with_defaults();
        let first: Vec<_> = (0..3).map(make_tx).collect();
        for tx in first.clone() {
            pool.add(tx).unwrap();
        }

        let drained = pool.drain_all();
        pool.add(make_tx(7)).unwrap();
        pool.restore(drained);

        let mut expected = hashes(&first);
        expected.push(make_tx(7).hash_hex());
        assert_eq!(hashes(&pool.snapshot()), expected);
    }

    #[test]
    fn test_restore_deduplicates_resubmitted() {
        let mut pool = TransactionPool::with_defaults();
        pool.add(make_tx(1)).unwrap();
        let drained = pool.drain_all();

        pool.add(make_tx(1)).unwrap();
        pool.restore(drained);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.snapshot().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_drain_restore_preserves_order(n in 1u8..20, extra in 0u8..10) {
            let mut pool = TransactionPool::new(PoolConfig::unbounded());
            let original: Vec<_> = (0..n).map(make_tx).collect();
            for tx in original.clone() {
                pool.add(tx).unwrap();
            }

            let drained = pool.drain_all();
            let newer: Vec<_> = (100..100 + extra).map(make_tx).collect();
            for tx in newer.clone() {
                pool.add(tx).unwrap();
            }
            pool.restore(drained);

            let mut expected = hashes(&original);
            expected.extend(hashes(&newer));
            prop_assert_eq!(hashes(&pool.drain_all()), expected);
        }
    }
}
