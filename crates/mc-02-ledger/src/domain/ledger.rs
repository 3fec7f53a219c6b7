//! # Ledger
//!
//! Append-only block list plus a hex-hash → position index kept in
//! lock-step. The indexes are derived data and can be rebuilt by replay.

use super::errors::LedgerError;
use super::validator::{check_linkage, validate_chain, validate_suffix};
use shared_crypto::Ed25519PublicKey;
use shared_types::{Block, Transaction};
use std::collections::HashMap;
use tracing::{debug, info};

/// Ordered blocks and their hash index.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    blocks: Vec<Block>,
    index: HashMap<String, usize>,
    /// Confirmed transaction hash → id of the block holding it.
    tx_index: HashMap<String, u64>,
}

impl Ledger {
    /// Empty ledger. Client nodes start here and receive genesis via sync.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger over a chain that has been fully validated against `authority`.
    pub fn from_blocks(blocks: Vec<Block>, authority: &Ed25519PublicKey) -> Result<Self, LedgerError> {
        validate_chain(&blocks, authority)?;
        let mut ledger = Self {
            blocks,
            ..Self::default()
        };
        ledger.rebuild_index();
        info!("[mc-02] Loaded ledger with {} blocks", ledger.len());
        Ok(ledger)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Last block, if any.
    pub fn tail(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Id the next block must carry.
    pub fn next_id(&self) -> u64 {
        self.tail().map_or(0, |b| b.id + 1)
    }

    pub fn get(&self, hash_hex: &str) -> Option<&Block> {
        self.index.get(hash_hex).map(|&pos| &self.blocks[pos])
    }

    pub fn contains(&self, hash_hex: &str) -> bool {
        self.index.contains_key(hash_hex)
    }

    /// Id of the block that confirmed a transaction.
    pub fn block_id_of_transaction(&self, tx_hash_hex: &str) -> Option<u64> {
        self.tx_index.get(tx_hash_hex).copied()
    }

    pub fn contains_transaction(&self, tx_hash_hex: &str) -> bool {
        self.tx_index.contains_key(tx_hash_hex)
    }

    /// Every confirmed transaction, in chain order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.blocks.iter().flat_map(|b| b.transactions.iter())
    }

    fn push(&mut self, block: Block) {
        for tx in &block.transactions {
            self.tx_index.insert(tx.hash_hex(), block.id);
        }
        self.index.insert(block.hash_hex(), self.blocks.len());
        self.blocks.push(block);
    }

    /// Appends a block built locally by the authority.
    ///
    /// Only linkage is checked; the caller has just hashed and signed it.
    pub fn append(&mut self, block: Block) -> Result<(), LedgerError> {
        check_linkage(&block, self.tail())?;
        debug!(
            "[mc-02] Appended block {} ({} txs)",
            block.id,
            block.transactions.len()
        );
        self.push(block);
        Ok(())
    }

    /// Checks a received block against this ledger's tail.
    pub fn validate_candidate(
        &self,
        block: &Block,
        authority: &Ed25519PublicKey,
    ) -> Result<(), LedgerError> {
        validate_suffix(std::slice::from_ref(block), self.tail(), authority)?;
        Ok(())
    }

    /// Validates every block as a suffix of this ledger, then appends them
    /// all. Nothing is appended if any block fails.
    pub fn append_validated(
        &mut self,
        blocks: Vec<Block>,
        authority: &Ed25519PublicKey,
    ) -> Result<usize, LedgerError> {
        validate_suffix(&blocks, self.tail(), authority)?;
        let count = blocks.len();
        for block in blocks {
            self.push(block);
        }
        if count > 0 {
            info!("[mc-02] Appended {} validated blocks, height now {}", count, self.len());
        }
        Ok(count)
    }

    /// Blocks after `last_known`, or the whole chain when it is `None`.
    ///
    /// # Errors
    ///
    /// `UnknownBlock` if `last_known` is not in this ledger.
    pub fn blocks_after(&self, last_known: Option<&str>) -> Result<Vec<Block>, LedgerError> {
        match last_known {
            None => Ok(self.blocks.clone()),
            Some(hash) => {
                let pos = self
                    .index
                    .get(hash)
                    .ok_or_else(|| LedgerError::UnknownBlock(hash.to_string()))?;
                Ok(self.blocks[pos + 1..].to_vec())
            }
        }
    }

    /// Recomputes both indexes from `blocks`.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .blocks
            .iter()
            .enumerate()
            .map(|(pos, b)| (b.hash_hex(), pos))
            .collect();
        self.tx_index = self
            .blocks
            .iter()
            .flat_map(|b| b.transactions.iter().map(move |tx| (tx.hash_hex(), b.id)))
            .collect();
    }
}
