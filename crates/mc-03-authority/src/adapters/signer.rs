use crate::ports::{BlockSigner, SignerError};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, Hash};

/// Signs with an in-process ed25519 key pair.
#[derive(Debug)]
pub struct KeyPairSigner {
    keypair: Ed25519KeyPair,
}

impl KeyPairSigner {
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        Self { keypair }
    }

    /// Fresh random authority key. The chain it signs cannot be reloaded by
    /// a later process unless the seed is configured.
    pub fn generate() -> Self {
        Self::new(Ed25519KeyPair::generate())
    }
}

impl BlockSigner for KeyPairSigner {
    fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    fn sign(&self, hash: &Hash) -> Result<Ed25519Signature, SignerError> {
        Ok(shared_crypto::sign(hash, &self.keypair))
    }
}
