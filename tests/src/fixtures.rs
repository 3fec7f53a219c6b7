//! Shared builders for integration flows.

use mc_02_ledger::Ledger;
use mc_03_authority::domain::create_genesis;
use mc_03_authority::{
    AuthorityConfig, AuthorityEngine, BlockSigner, KeyPairSigner, ManualClock, SignerError,
};
use shared_crypto::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, EncryptionKeyPair, EncryptionPublicKey,
    Hash,
};
use shared_types::{MedicalRecord, PayloadShape, Transaction};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const START: i64 = 1_700_000_000;

/// Signer that can be switched off mid-test.
pub struct SwitchableSigner {
    inner: KeyPairSigner,
    fail: AtomicBool,
}

impl SwitchableSigner {
    pub fn new() -> Self {
        Self {
            inner: KeyPairSigner::generate(),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl BlockSigner for SwitchableSigner {
    fn public_key(&self) -> Ed25519PublicKey {
        self.inner.public_key()
    }

    fn sign(&self, hash: &Hash) -> Result<Ed25519Signature, SignerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SignerError::Unavailable("signing device offline".into()));
        }
        self.inner.sign(hash)
    }
}

pub struct TestAuthority {
    pub engine: Arc<AuthorityEngine>,
    pub signer: Arc<SwitchableSigner>,
    pub clock: Arc<ManualClock>,
}

/// Engine over a fresh genesis-only ledger.
pub fn authority(seal_threshold: usize) -> TestAuthority {
    let config = AuthorityConfig {
        seal_threshold,
        max_pool_size: None,
        ..AuthorityConfig::for_testing()
    };
    let signer = Arc::new(SwitchableSigner::new());
    let clock = Arc::new(ManualClock::new(START));

    let mut ledger = Ledger::new();
    ledger
        .append(create_genesis(signer.as_ref(), START).unwrap())
        .unwrap();

    let engine = Arc::new(
        AuthorityEngine::new(config, signer.clone(), clock.clone(), ledger).unwrap(),
    );
    TestAuthority {
        engine,
        signer,
        clock,
    }
}

pub fn record(n: usize) -> MedicalRecord {
    MedicalRecord {
        record_type: "consultation".into(),
        notes: format!("visit #{}", n),
        results: format!("reading {}", n * 7),
    }
}

/// Signed record transaction for `recipient`.
pub fn record_tx(doctor: &Ed25519KeyPair, recipient: &EncryptionPublicKey, n: usize) -> Transaction {
    Transaction::new_record(&record(n), doctor, recipient, PayloadShape::Whole).unwrap()
}

/// `count` distinct signed transactions, each for a fresh patient.
pub fn transactions(count: usize) -> Vec<Transaction> {
    let doctor = Ed25519KeyPair::generate();
    (0..count)
        .map(|n| record_tx(&doctor, &EncryptionKeyPair::generate().public_key(), n))
        .collect()
}
