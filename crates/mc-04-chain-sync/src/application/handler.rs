//! # Sync Handler
//!
//! Authority-side answer to a `SyncRequest`.

use crate::domain::{SyncError, SyncRequest, SyncResponse};
use mc_02_ledger::Ledger;
use tracing::{debug, warn};

/// Blocks the requester is missing.
///
/// - no hash (or `""`): the whole chain
/// - known hash: every block after it, possibly none
/// - unknown hash: `UnknownBlock`, so a diverged client never mistakes
///   itself for up to date
pub fn handle_sync(ledger: &Ledger, request: &SyncRequest) -> Result<SyncResponse, SyncError> {
    let from = request.resume_from();
    match ledger.blocks_after(from) {
        Ok(blocks) => {
            debug!(
                "[mc-04] Serving {} blocks after {}",
                blocks.len(),
                from.unwrap_or("<genesis>")
            );
            Ok(SyncResponse { blocks })
        }
        Err(e) => {
            warn!("[mc-04] Sync request for unknown block {:?}", from);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::client::test_support::chain;
    use shared_crypto::Ed25519KeyPair;

    fn ids(resp: &SyncResponse) -> Vec<u64> {
        resp.blocks.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_sync_after_known_hash() {
        let authority = Ed25519KeyPair::generate();
        let blocks = chain(&authority, 4);
        let ledger = Ledger::from_blocks(blocks.clone(), &authority.public_key()).unwrap();

        let resp = handle_sync(&ledger, &SyncRequest::after(blocks[1].hash_hex())).unwrap();
        assert_eq!(ids(&resp), vec![2, 3]);
    }

    #[test]
    fn test_sync_from_empty_returns_all() {
        let authority = Ed25519KeyPair::generate();
        let ledger = Ledger::from_blocks(chain(&authority, 4), &authority.public_key()).unwrap();

        assert_eq!(ids(&handle_sync(&ledger, &SyncRequest::full()).unwrap()), vec![0, 1, 2, 3]);
        assert_eq!(
            ids(&handle_sync(&ledger, &SyncRequest::after("")).unwrap()),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_sync_at_tail_is_empty() {
        let authority = Ed25519KeyPair::generate();
        let blocks = chain(&authority, 2);
        let ledger = Ledger::from_blocks(blocks.clone(), &authority.public_key()).unwrap();

        let resp = handle_sync(&ledger, &SyncRequest::after(blocks[1].hash_hex())).unwrap();
        assert!(resp.blocks.is_empty());
    }

    #[test]
    fn test_sync_unknown_hash() {
        let authority = Ed25519KeyPair::generate();
        let ledger = Ledger::from_blocks(chain(&authority, 2), &authority.public_key()).unwrap();

        let result = handle_sync(&ledger, &SyncRequest::after("ff".repeat(32)));
        assert!(matches!(result, Err(SyncError::UnknownBlock(_))));
    }
}
