use crate::domain::errors::StoreError;
use crate::ports::outbound::LedgerStore;
use shared_types::Block;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Block list persisted as one JSON document.
///
/// Saves write a sibling temp file and rename it over the target, so a
/// crash mid-write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct JsonFileLedgerStore {
    path: PathBuf,
}

impl JsonFileLedgerStore {
    /// Create a store at the given path. The file need not exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for JsonFileLedgerStore {
    fn load(&self) -> Result<Vec<Block>, StoreError> {
        if !self.path.exists() {
            info!("[mc-02] No existing ledger file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let blocks: Vec<Block> = serde_json::from_slice(&bytes)?;
        info!(
            "[mc-02] Loaded {} blocks from {}",
            blocks.len(),
            self.path.display()
        );
        Ok(blocks)
    }

    fn save(&self, blocks: &[Block]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(blocks)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("[mc-02] Saved {} blocks to {}", blocks.len(), self.path.display());
        Ok(())
    }
}
