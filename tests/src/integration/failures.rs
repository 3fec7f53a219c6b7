//! # Failure Flows
//!
//! A failed seal must leave both the ledger and the pool as they were.

#[cfg(test)]
mod tests {
    use crate::fixtures::{authority, transactions};
    use mc_03_authority::{AuthorityError, SubmitOutcome};

    #[test]
    fn test_signing_failure_restores_pool_in_order() {
        let authority = authority(10);
        let engine = &authority.engine;
        let txs = transactions(4);
        for tx in &txs {
            engine.submit(tx.clone()).unwrap();
        }
        let chain_before = engine.blocks();

        authority.signer.set_failing(true);
        assert!(matches!(
            engine.seal_block(),
            Err(AuthorityError::SignatureGenerationFailed(_))
        ));
        assert_eq!(engine.pending_transactions(), txs);
        assert_eq!(engine.blocks(), chain_before);

        authority.signer.set_failing(false);
        let block = engine.seal_block().unwrap();
        assert_eq!(block.transactions, txs);
        assert_eq!(block.id, 1);
        assert_eq!(engine.pending_count(), 0);
    }

    #[test]
    fn test_threshold_seal_failure_keeps_submission() {
        let authority = authority(2);
        let engine = &authority.engine;
        let txs = transactions(3);

        authority.signer.set_failing(true);
        engine.submit(txs[0].clone()).unwrap();
        // Filling the pool tries to seal, fails, and keeps both.
        assert_eq!(
            engine.submit(txs[1].clone()).unwrap(),
            SubmitOutcome::Pooled { pending: 2 }
        );
        assert_eq!(engine.height(), 1);
        assert_eq!(engine.pending_transactions(), txs[..2].to_vec());

        authority.signer.set_failing(false);
        let outcome = engine.submit(txs[2].clone()).unwrap();
        match outcome {
            SubmitOutcome::Sealed(block) => assert_eq!(block.transactions, txs),
            other => panic!("expected a sealed block, got {:?}", other),
        }
    }

    #[test]
    fn test_confirmed_transaction_cannot_be_resubmitted() {
        let authority = authority(1);
        let tx = transactions(1).remove(0);
        authority.engine.submit(tx.clone()).unwrap();

        assert_eq!(
            authority.engine.submit(tx.clone()),
            Err(AuthorityError::DuplicateTransaction(tx.hash_hex()))
        );
        assert_eq!(authority.engine.height(), 2);
    }
}
