//! # Tampering
//!
//! Any change to a sealed block after signing is caught by its hash, and a
//! re-hashed forgery by its signature.

#[cfg(test)]
mod tests {
    use crate::fixtures::{authority, transactions};
    use mc_02_ledger::{
        validate_block, validate_chain, JsonFileLedgerStore, Ledger, LedgerError, LedgerStore,
        ValidationError,
    };
    use mc_03_authority::{bootstrap_ledger, AuthorityError, BlockSigner};
    use shared_crypto::Ed25519PublicKey;
    use shared_types::{Block, Payload};

    fn sealed_chain() -> (Vec<Block>, Ed25519PublicKey) {
        let authority = authority(2);
        for tx in transactions(4) {
            authority.engine.submit(tx).unwrap();
        }
        (authority.engine.blocks(), authority.signer.public_key())
    }

    #[test]
    fn test_altered_transaction_field_fails_hash() {
        let (mut chain, key) = sealed_chain();
        chain[1].transactions[0].timestamp += 1;

        assert_eq!(
            validate_block(&chain[1], Some(&chain[0]), &key),
            Err(ValidationError::InvalidHash { block_id: 1 })
        );
    }

    #[test]
    fn test_altered_ciphertext_fails_hash() {
        let (mut chain, key) = sealed_chain();
        if let Payload::Sealed { ciphertext, .. } = &mut chain[2].transactions[1].payload {
            ciphertext[0] ^= 0x01;
        }

        assert_eq!(
            validate_chain(&chain, &key),
            Err(ValidationError::InvalidHash { block_id: 2 })
        );
    }

    #[test]
    fn test_rehashed_forgery_fails_signature() {
        let (mut chain, key) = sealed_chain();
        chain[1].transactions.pop();
        chain[1].hash = chain[1].compute_hash();

        assert_eq!(
            validate_block(&chain[1], Some(&chain[0]), &key),
            Err(ValidationError::InvalidSignature { block_id: 1 })
        );
    }

    #[test]
    fn test_reordered_blocks_fail_linkage() {
        let (mut chain, key) = sealed_chain();
        chain.swap(1, 2);
        assert!(matches!(
            validate_chain(&chain, &key),
            Err(ValidationError::LinkageMismatch { .. })
        ));
        assert!(Ledger::from_blocks(chain, &key).is_err());
    }

    #[test]
    fn test_tampered_chain_file_is_refused_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileLedgerStore::new(dir.path().join("chain.json"));

        let authority = authority(1);
        for tx in transactions(2) {
            authority.engine.submit(tx).unwrap();
        }
        let mut chain = authority.engine.blocks();
        chain[2].transactions[0].timestamp -= 60;
        store.save(&chain).unwrap();

        let err = bootstrap_ledger(&store, authority.signer.as_ref(), authority.clock.as_ref())
            .unwrap_err();
        assert_eq!(
            err,
            AuthorityError::Ledger(LedgerError::Validation(ValidationError::InvalidHash {
                block_id: 2
            }))
        );
    }
}
