//! # Core Domain Entities
//!
//! Transactions carry one encrypted medical record from a doctor to a
//! patient; blocks batch them under the authority's signature.

use crate::encoding;
use crate::errors::EntityError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_crypto::{
    sha256, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, EncryptionPublicKey, WrappedKey,
    NONCE_LEN, TAG_LEN,
};

pub use shared_crypto::Hash;

/// Lowercase hex of a hash, the form used as a map key and on the wire.
pub fn hash_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Current time as epoch seconds.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// One AES-GCM sealed value.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedField {
    #[serde_as(as = "Hex")]
    pub ciphertext: Vec<u8>,
    #[serde_as(as = "Hex")]
    pub nonce: Vec<u8>,
}

impl SealedField {
    fn check(&self, name: &str) -> Result<(), EntityError> {
        check_sealed(name, &self.ciphertext, &self.nonce)
    }
}

fn check_sealed(name: &str, ciphertext: &[u8], nonce: &[u8]) -> Result<(), EntityError> {
    if nonce.len() != NONCE_LEN {
        return Err(EntityError::MalformedTransaction(format!(
            "{} nonce is {} bytes, expected {}",
            name,
            nonce.len(),
            NONCE_LEN
        )));
    }
    if ciphertext.len() < TAG_LEN {
        return Err(EntityError::MalformedTransaction(format!(
            "{} ciphertext is {} bytes, shorter than the {}-byte tag",
            name,
            ciphertext.len(),
            TAG_LEN
        )));
    }
    Ok(())
}

/// Encrypted record content.
///
/// `Fields` seals each record field separately. It is kept for
/// compatibility with per-field producers and reveals which fields exist
/// and roughly how long each is; `Sealed` reveals only the total length.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Whole record JSON sealed once.
    Sealed {
        #[serde_as(as = "Hex")]
        ciphertext: Vec<u8>,
        #[serde_as(as = "Hex")]
        nonce: Vec<u8>,
    },
    /// Each field sealed on its own.
    Fields {
        record_type: SealedField,
        notes: SealedField,
        results: SealedField,
    },
}

/// A doctor-signed medical record transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// SHA-256 of the canonical preimage, fixed at creation.
    #[serde_as(as = "Hex")]
    pub hash: Hash,
    pub payload: Payload,
    /// Payload key wrapped for the recipient.
    pub wrapped_key: Option<WrappedKey>,
    /// Doctor's signing key.
    pub sender_identity: Ed25519PublicKey,
    /// Patient's encryption key.
    pub recipient_identity: EncryptionPublicKey,
    pub signature: Option<Ed25519Signature>,
    /// Epoch seconds. Advisory only.
    pub timestamp: i64,
}

impl Transaction {
    /// Create an unsigned transaction stamped with the current time.
    pub fn new(
        payload: Payload,
        sender: Ed25519PublicKey,
        recipient: EncryptionPublicKey,
        wrapped_key: Option<WrappedKey>,
    ) -> Self {
        Self::with_timestamp(payload, sender, recipient, wrapped_key, now_timestamp())
    }

    /// Create an unsigned transaction with an explicit timestamp.
    pub fn with_timestamp(
        payload: Payload,
        sender: Ed25519PublicKey,
        recipient: EncryptionPublicKey,
        wrapped_key: Option<WrappedKey>,
        timestamp: i64,
    ) -> Self {
        let mut tx = Self {
            hash: [0u8; 32],
            payload,
            wrapped_key,
            sender_identity: sender,
            recipient_identity: recipient,
            signature: None,
            timestamp,
        };
        tx.hash = tx.compute_hash();
        tx
    }

    /// Recompute the canonical hash from the current field values.
    pub fn compute_hash(&self) -> Hash {
        sha256(&encoding::transaction_preimage(self))
    }

    /// Hex form of the stored hash.
    pub fn hash_hex(&self) -> String {
        hash_hex(&self.hash)
    }

    /// Sign the stored hash with the sender's key pair.
    ///
    /// # Errors
    ///
    /// `SignerMismatch` if `keypair` is not the declared sender.
    pub fn sign(&mut self, keypair: &Ed25519KeyPair) -> Result<(), EntityError> {
        if keypair.public_key() != self.sender_identity {
            return Err(EntityError::SignerMismatch);
        }
        self.signature = Some(shared_crypto::sign(&self.hash, keypair));
        Ok(())
    }

    /// Check the stored hash against the fields.
    pub fn verify_integrity(&self) -> Result<(), EntityError> {
        let computed = self.compute_hash();
        if computed != self.hash {
            return Err(EntityError::HashMismatch {
                stored: hash_hex(&self.hash),
                computed: hash_hex(&computed),
            });
        }
        Ok(())
    }

    /// Check the signature over the stored hash under the sender key.
    pub fn verify_signature(&self) -> Result<(), EntityError> {
        let signature = self.signature.as_ref().ok_or(EntityError::MissingSignature)?;
        shared_crypto::verify(&self.hash, signature, &self.sender_identity)
            .map_err(|_| EntityError::InvalidSignature)
    }

    /// Check that every sealed value, the wrapped key and the recipient
    /// could have come out of the envelope primitives.
    ///
    /// # Errors
    ///
    /// `MalformedTransaction` naming the first offending field.
    pub fn validate_shape(&self) -> Result<(), EntityError> {
        match &self.payload {
            Payload::Sealed { ciphertext, nonce } => check_sealed("payload", ciphertext, nonce)?,
            Payload::Fields {
                record_type,
                notes,
                results,
            } => {
                record_type.check("record_type")?;
                notes.check("notes")?;
                results.check("results")?;
            }
        }
        if let Some(wrapped) = &self.wrapped_key {
            wrapped
                .validate_shape()
                .map_err(|e| EntityError::MalformedTransaction(format!("wrapped key: {}", e)))?;
        }
        EncryptionPublicKey::from_bytes(*self.recipient_identity.as_bytes())
            .map_err(|e| EntityError::MalformedTransaction(format!("recipient identity: {}", e)))?;
        Ok(())
    }

    /// Shape, integrity, then signature.
    pub fn verify(&self) -> Result<(), EntityError> {
        self.validate_shape()?;
        self.verify_integrity()?;
        self.verify_signature()
    }
}

/// A batch of transactions sealed by the authority.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain; 0 is genesis.
    pub id: u64,
    #[serde_as(as = "Option<Hex>")]
    pub previous_hash: Option<Hash>,
    pub transactions: Vec<Transaction>,
    pub timestamp: i64,
    #[serde_as(as = "Hex")]
    pub hash: Hash,
    /// Authority signature over `hash`.
    pub signature: Option<Ed25519Signature>,
}

impl Block {
    /// Build an unsigned block stamped with the current time.
    pub fn new(transactions: Vec<Transaction>, previous_hash: Option<Hash>, id: u64) -> Self {
        Self::with_timestamp(transactions, previous_hash, id, now_timestamp())
    }

    /// Build an unsigned block with an explicit timestamp.
    pub fn with_timestamp(
        transactions: Vec<Transaction>,
        previous_hash: Option<Hash>,
        id: u64,
        timestamp: i64,
    ) -> Self {
        let mut block = Self {
            id,
            previous_hash,
            transactions,
            timestamp,
            hash: [0u8; 32],
            signature: None,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Unsigned genesis block: id 0, no parent, no transactions.
    pub fn genesis() -> Self {
        Self::new(Vec::new(), None, 0)
    }

    pub fn is_genesis(&self) -> bool {
        self.id == 0
    }

    /// Recompute the canonical hash from the current field values.
    pub fn compute_hash(&self) -> Hash {
        sha256(&encoding::block_preimage(self))
    }

    pub fn hash_hex(&self) -> String {
        hash_hex(&self.hash)
    }

    /// Attach an authority signature produced over `self.hash`.
    pub fn attach_signature(&mut self, signature: Ed25519Signature) {
        self.signature = Some(signature);
    }

    /// Sign the stored hash with the authority key pair.
    pub fn sign(&mut self, keypair: &Ed25519KeyPair) {
        self.attach_signature(shared_crypto::sign(&self.hash, keypair));
    }

    /// Check the signature over the stored hash under `authority`.
    pub fn verify_signature(&self, authority: &Ed25519PublicKey) -> Result<(), EntityError> {
        let signature = self.signature.as_ref().ok_or(EntityError::MissingSignature)?;
        shared_crypto::verify(&self.hash, signature, authority)
            .map_err(|_| EntityError::InvalidSignature)
    }
}
