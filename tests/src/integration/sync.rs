//! # Authority to Client Replication
//!
//! A client node syncing from an authority engine through an in-process
//! connection: same handler the HTTP route uses, no sockets.

#[cfg(test)]
mod tests {
    use crate::fixtures::{authority, transactions, TestAuthority};
    use async_trait::async_trait;
    use mc_03_authority::{AuthorityEngine, BlockSigner};
    use mc_04_chain_sync::{
        handle_sync, AuthorityConnection, ClientNode, ClientSyncConfig, SyncError, SyncRequest,
        SyncResponse,
    };
    use parking_lot::Mutex;
    use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey};
    use shared_types::{Block, Transaction};
    use std::sync::Arc;

    struct InProcess {
        engine: Arc<AuthorityEngine>,
        /// Served instead of the engine's answer when set.
        forged: Mutex<Option<Vec<Block>>>,
    }

    #[async_trait]
    impl AuthorityConnection for InProcess {
        async fn fetch_public_key(&self) -> Result<Ed25519PublicKey, SyncError> {
            Ok(self.engine.public_key())
        }

        async fn request_sync(&self, request: SyncRequest) -> Result<SyncResponse, SyncError> {
            if let Some(blocks) = self.forged.lock().clone() {
                return Ok(SyncResponse { blocks });
            }
            self.engine.with_ledger(|ledger| handle_sync(ledger, &request))
        }

        async fn forward_transaction(&self, tx: &Transaction) -> Result<(), SyncError> {
            self.engine
                .submit(tx.clone())
                .map(|_| ())
                .map_err(|e| SyncError::Rejected {
                    status: 400,
                    message: e.to_string(),
                })
        }

        fn endpoint(&self) -> &str {
            "in-process"
        }
    }

    /// Authority with `[G, B1, B2, B3]`, one transaction per block.
    fn four_block_authority() -> TestAuthority {
        let authority = authority(1);
        for tx in transactions(3) {
            authority.engine.submit(tx).unwrap();
        }
        assert_eq!(authority.engine.height(), 4);
        authority
    }

    fn client_of(authority: &TestAuthority) -> (Arc<ClientNode>, Arc<InProcess>) {
        let connection = Arc::new(InProcess {
            engine: Arc::clone(&authority.engine),
            forged: Mutex::new(None),
        });
        let node = Arc::new(ClientNode::new(
            ClientSyncConfig::for_testing(),
            connection.clone(),
        ));
        (node, connection)
    }

    #[test]
    fn test_sync_handler_serves_suffix() {
        let authority = four_block_authority();
        let chain = authority.engine.blocks();

        let after_b1 = authority
            .engine
            .with_ledger(|l| handle_sync(l, &SyncRequest::after(chain[1].hash_hex())))
            .unwrap();
        assert_eq!(after_b1.blocks, chain[2..].to_vec());

        let full = authority
            .engine
            .with_ledger(|l| handle_sync(l, &SyncRequest::full()))
            .unwrap();
        assert_eq!(full.blocks, chain);

        let unknown = authority
            .engine
            .with_ledger(|l| handle_sync(l, &SyncRequest::after("00".repeat(32))));
        assert!(matches!(unknown, Err(SyncError::UnknownBlock(_))));
    }

    #[tokio::test]
    async fn test_client_replicates_and_follows() {
        let authority = four_block_authority();
        let (client, _) = client_of(&authority);

        assert_eq!(client.sync_once().await.unwrap(), 4);
        assert_eq!(client.blocks(), authority.engine.blocks());
        assert_eq!(client.authority_key(), Some(authority.signer.public_key()));

        for tx in transactions(2) {
            authority.engine.submit(tx).unwrap();
        }
        assert_eq!(client.sync_once().await.unwrap(), 2);
        assert_eq!(client.sync_once().await.unwrap(), 0);
        assert_eq!(client.blocks(), authority.engine.blocks());
    }

    #[tokio::test]
    async fn test_client_refuses_forged_suffix() {
        let authority = four_block_authority();
        let (client, connection) = client_of(&authority);
        client.sync_once().await.unwrap();

        // A block linked to the real tail but signed by someone else.
        let tail = authority.engine.blocks().pop().unwrap();
        let mut forged = Block::new(transactions(1), Some(tail.hash), tail.id + 1);
        forged.sign(&Ed25519KeyPair::generate());
        *connection.forged.lock() = Some(vec![forged]);

        assert!(matches!(
            client.sync_once().await,
            Err(SyncError::Validation(_))
        ));
        assert_eq!(client.height(), 4);
    }

    #[tokio::test]
    async fn test_forwarded_transactions_reach_the_chain() {
        let authority = authority(2);
        let (client, _) = client_of(&authority);

        for tx in transactions(2) {
            client.forward_transaction(&tx).await.unwrap();
        }
        assert_eq!(authority.engine.height(), 2);

        client.sync_once().await.unwrap();
        assert_eq!(client.height(), 2);
        assert_eq!(client.blocks()[1].transactions.len(), 2);
    }
}
