//! # Chain Validator
//!
//! Stateless checks of a block against its predecessor and the authority
//! key. Anyone holding the authority public key can run them.

use super::errors::ValidationError;
use shared_crypto::Ed25519PublicKey;
use shared_types::{hash_hex, Block};
use tracing::warn;

/// Checks id contiguity and `previous_hash` linkage.
pub fn check_linkage(block: &Block, previous: Option<&Block>) -> Result<(), ValidationError> {
    let mismatch = |reason: String| ValidationError::LinkageMismatch {
        block_id: block.id,
        reason,
    };

    match previous {
        None => {
            if block.id != 0 {
                return Err(mismatch(format!("first block has id {}", block.id)));
            }
            if block.previous_hash.is_some() {
                return Err(mismatch("genesis has a previous hash".into()));
            }
        }
        Some(prev) => {
            if block.id != prev.id + 1 {
                return Err(mismatch(format!(
                    "expected id {}, got {}",
                    prev.id + 1,
                    block.id
                )));
            }
            match &block.previous_hash {
                Some(h) if *h == prev.hash => {}
                Some(h) => {
                    return Err(mismatch(format!(
                        "previous hash {} does not match tail {}",
                        hash_hex(h),
                        prev.hash_hex()
                    )))
                }
                None => return Err(mismatch("missing previous hash".into())),
            }
        }
    }
    Ok(())
}

/// Validates one block.
///
/// `previous` is the block it must follow, or `None` if it must be genesis.
pub fn validate_block(
    block: &Block,
    previous: Option<&Block>,
    authority: &Ed25519PublicKey,
) -> Result<(), ValidationError> {
    if block.compute_hash() != block.hash {
        warn!(
            target: "security",
            "[mc-02] Block {} hash does not match its contents",
            block.id
        );
        return Err(ValidationError::InvalidHash { block_id: block.id });
    }

    if block.verify_signature(authority).is_err() {
        warn!(
            target: "security",
            "[mc-02] Block {} is not signed by the authority",
            block.id
        );
        return Err(ValidationError::InvalidSignature { block_id: block.id });
    }

    check_linkage(block, previous)?;

    for tx in &block.transactions {
        if let Err(e) = tx.verify() {
            warn!(
                target: "security",
                "[mc-02] Block {} carries invalid transaction {}: {}",
                block.id,
                tx.hash_hex(),
                e
            );
            return Err(ValidationError::InvalidTransaction {
                block_id: block.id,
                tx_hash: tx.hash_hex(),
                reason: e.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a full chain from genesis, stopping at the first failure.
pub fn validate_chain(blocks: &[Block], authority: &Ed25519PublicKey) -> Result<(), ValidationError> {
    validate_suffix(blocks, None, authority)
}

/// Validates `blocks` as a suffix following `tail`.
pub fn validate_suffix(
    blocks: &[Block],
    tail: Option<&Block>,
    authority: &Ed25519PublicKey,
) -> Result<(), ValidationError> {
    let mut previous = tail;
    for block in blocks {
        validate_block(block, previous, authority)?;
        previous = Some(block);
    }
    Ok(())
}
