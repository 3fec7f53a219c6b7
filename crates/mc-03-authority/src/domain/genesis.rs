//! Genesis block construction

use crate::error::{AuthorityError, Result};
use crate::ports::BlockSigner;
use shared_types::Block;
use tracing::info;

/// Build and sign block 0 with the given timestamp.
pub fn create_genesis(signer: &dyn BlockSigner, timestamp: i64) -> Result<Block> {
    let mut genesis = Block::with_timestamp(Vec::new(), None, 0, timestamp);
    let signature = signer
        .sign(&genesis.hash)
        .map_err(|e| AuthorityError::SignatureGenerationFailed(e.to_string()))?;
    genesis.attach_signature(signature);

    info!("[mc-03] Created genesis block {}", genesis.hash_hex());
    Ok(genesis)
}
