//! # Outbound Ports (Driven Ports)
//!
//! Persistence the host application provides. Durability guarantees are the
//! adapter's business; the ledger only needs the block list back in order.

use crate::domain::errors::StoreError;
use shared_types::Block;

/// Load/save of the full block list.
///
/// Production: `JsonFileLedgerStore`
/// Testing: `InMemoryLedgerStore`
pub trait LedgerStore: Send + Sync {
    /// All persisted blocks in chain order. Empty if nothing was saved yet.
    fn load(&self) -> Result<Vec<Block>, StoreError>;

    /// Replace the persisted block list.
    fn save(&self, blocks: &[Block]) -> Result<(), StoreError>;
}
