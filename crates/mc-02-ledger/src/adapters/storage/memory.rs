use crate::domain::errors::StoreError;
use crate::ports::outbound::LedgerStore;
use parking_lot::Mutex;
use shared_types::Block;

/// In-memory block store for tests and ephemeral nodes.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    blocks: Mutex<Vec<Block>>,
    saves: Mutex<usize>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `blocks`.
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks: Mutex::new(blocks),
            saves: Mutex::new(0),
        }
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<Vec<Block>, StoreError> {
        Ok(self.blocks.lock().clone())
    }

    fn save(&self, blocks: &[Block]) -> Result<(), StoreError> {
        *self.blocks.lock() = blocks.to_vec();
        *self.saves.lock() += 1;
        Ok(())
    }
}
