//! # Sealing Flows
//!
//! Threshold, interval and on-demand sealing through the authority engine,
//! checked against the public validator.

#[cfg(test)]
mod tests {
    use crate::fixtures::{authority, transactions, START};
    use mc_02_ledger::{validate_block, validate_chain, ValidationError};
    use mc_03_authority::{AuthorityError, BlockSigner, SubmitOutcome};
    use shared_crypto::Ed25519KeyPair;

    #[test]
    fn test_tenth_submission_seals_one_block_in_submission_order() {
        let authority = authority(10);
        let engine = &authority.engine;
        let txs = transactions(11);

        for tx in &txs[..9] {
            assert!(matches!(
                engine.submit(tx.clone()).unwrap(),
                SubmitOutcome::Pooled { .. }
            ));
        }
        let block = match engine.submit(txs[9].clone()).unwrap() {
            SubmitOutcome::Sealed(block) => block,
            other => panic!("expected a sealed block, got {:?}", other),
        };

        assert_eq!(block.id, 1);
        assert_eq!(block.transactions, txs[..10].to_vec());
        assert_eq!(engine.pending_count(), 0);
        assert_eq!(engine.height(), 2);

        // The 11th only pools.
        assert_eq!(
            engine.submit(txs[10].clone()).unwrap(),
            SubmitOutcome::Pooled { pending: 1 }
        );
        assert_eq!(engine.height(), 2);
    }

    #[test]
    fn test_sealed_block_validates_only_with_authority_key() {
        let authority = authority(2);
        let engine = &authority.engine;
        for tx in transactions(2) {
            engine.submit(tx).unwrap();
        }

        let chain = engine.blocks();
        let key = authority.signer.public_key();
        assert!(validate_chain(&chain, &key).is_ok());
        assert!(validate_block(&chain[1], Some(&chain[0]), &key).is_ok());

        let stranger = Ed25519KeyPair::generate().public_key();
        assert_eq!(
            validate_block(&chain[1], Some(&chain[0]), &stranger),
            Err(ValidationError::InvalidSignature { block_id: 1 })
        );
    }

    #[test]
    fn test_every_block_links_to_its_predecessor() {
        let authority = authority(3);
        for tx in transactions(9) {
            authority.engine.submit(tx).unwrap();
        }

        let chain = authority.engine.blocks();
        assert_eq!(chain.len(), 4);
        for pair in chain.windows(2) {
            assert_eq!(pair[1].id, pair[0].id + 1);
            assert_eq!(pair[1].previous_hash, Some(pair[0].hash));
            assert_eq!(pair[1].compute_hash(), pair[1].hash);
        }
    }

    #[test]
    fn test_manual_seal_on_empty_pool_changes_nothing() {
        let authority = authority(10);
        let before = authority.engine.blocks();

        assert_eq!(
            authority.engine.seal_block(),
            Err(AuthorityError::NotEnoughTransactions)
        );
        assert_eq!(authority.engine.blocks(), before);
    }

    #[test]
    fn test_interval_seal_of_partial_pool() {
        let authority = authority(10);
        let engine = &authority.engine;
        let interval = engine.config().max_block_interval_secs as i64;
        for tx in transactions(2) {
            engine.submit(tx).unwrap();
        }

        assert_eq!(engine.seal_if_due(START + interval - 1).unwrap(), None);

        authority.clock.advance(interval);
        let block = engine.seal_if_due(START + interval).unwrap().unwrap();
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.timestamp, START + interval);

        // Nothing pending: the interval alone never seals.
        authority.clock.advance(interval * 10);
        assert_eq!(engine.seal_if_due(START + interval * 11).unwrap(), None);
        assert_eq!(engine.height(), 2);
    }
}
