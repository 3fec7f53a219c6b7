//! # Key Wrapping
//!
//! Wraps a payload [`SymmetricKey`] for a single recipient holding a
//! secp256k1 key pair.
//!
//! ```text
//! ephemeral = random secp256k1 key
//! shared    = ECDH(ephemeral, recipient_public)
//! kek       = HKDF-SHA256(salt = eph_pub || recipient_pub, ikm = shared, info = "mc/key-wrap/v1")
//! wrapped   = AES-256-GCM(kek, symmetric_key)
//! ```
//!
//! The ephemeral public key travels with the output. Unwrapping with any
//! other secret key derives a different KEK and fails authentication.

use crate::symmetric::{self, SymmetricKey, KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::CryptoError;
use hkdf::Hkdf;
use k256::ecdh::{diffie_hellman, EphemeralSecret, SharedSecret};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{hex::Hex, serde_as, DeserializeAs};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

/// Compressed SEC1 public key length.
pub const PUBLIC_KEY_LEN: usize = 33;

const WRAP_INFO: &[u8] = b"mc/key-wrap/v1";

/// Recipient encryption public key (compressed secp256k1, 33 bytes).
///
/// Every constructor, deserialization included, checks the point is on
/// the curve.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EncryptionPublicKey(#[serde_as(as = "Hex")] [u8; PUBLIC_KEY_LEN]);

impl<'de> Deserialize<'de> for EncryptionPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: [u8; PUBLIC_KEY_LEN] = <Hex>::deserialize_as(deserializer)?;
        Self::from_bytes(bytes).map_err(serde::de::Error::custom)
    }
}

impl EncryptionPublicKey {
    /// Create from bytes, checking the point is on the curve.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        PublicKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice (33 bytes).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; PUBLIC_KEY_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_bytes(arr)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    fn to_point(self) -> Result<PublicKey, CryptoError> {
        PublicKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)
    }
}

fn compress(public_key: &PublicKey) -> [u8; PUBLIC_KEY_LEN] {
    let encoded = public_key.to_encoded_point(true);
    let mut bytes = [0u8; PUBLIC_KEY_LEN];
    bytes.copy_from_slice(encoded.as_bytes());
    bytes
}

/// secp256k1 key pair used to receive wrapped keys.
#[derive(Clone)]
pub struct EncryptionKeyPair {
    secret: SecretKey,
}

impl EncryptionKeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        Self {
            secret: SecretKey::random(&mut OsRng),
        }
    }

    /// Create from secret scalar bytes (32 bytes).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { secret })
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> EncryptionPublicKey {
        EncryptionPublicKey(compress(&self.secret.public_key()))
    }

    /// Get secret scalar bytes (for configuration round-trips).
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.to_bytes().into())
    }
}

impl fmt::Debug for EncryptionKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// A symmetric key wrapped for one recipient.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKey {
    /// Sender's ephemeral public key (compressed, 33 bytes).
    #[serde_as(as = "Hex")]
    pub ephemeral_public_key: Vec<u8>,
    /// AES-GCM nonce of the wrapping seal.
    #[serde_as(as = "Hex")]
    pub nonce: Vec<u8>,
    /// Sealed symmetric key.
    #[serde_as(as = "Hex")]
    pub ciphertext: Vec<u8>,
}

impl WrappedKey {
    /// Check field lengths and the ephemeral point without unwrapping.
    ///
    /// # Errors
    ///
    /// - `InvalidPublicKey` if the ephemeral key is not a curve point
    /// - `InvalidNonceLength` if the nonce is not 12 bytes
    /// - `InvalidKeyLength` if the ciphertext is not a sealed 32-byte key
    pub fn validate_shape(&self) -> Result<(), CryptoError> {
        EncryptionPublicKey::from_slice(&self.ephemeral_public_key)?;
        if self.nonce.len() != NONCE_LEN {
            return Err(CryptoError::InvalidNonceLength {
                expected: NONCE_LEN,
                actual: self.nonce.len(),
            });
        }
        if self.ciphertext.len() != KEY_LEN + TAG_LEN {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_LEN + TAG_LEN,
                actual: self.ciphertext.len(),
            });
        }
        Ok(())
    }
}

fn derive_kek(
    shared: &SharedSecret,
    ephemeral_public: &[u8; PUBLIC_KEY_LEN],
    recipient_public: &[u8; PUBLIC_KEY_LEN],
) -> Result<SymmetricKey, CryptoError> {
    let mut salt = [0u8; PUBLIC_KEY_LEN * 2];
    salt[..PUBLIC_KEY_LEN].copy_from_slice(ephemeral_public);
    salt[PUBLIC_KEY_LEN..].copy_from_slice(recipient_public);

    let hk = Hkdf::<Sha256>::new(Some(&salt), shared.raw_secret_bytes().as_slice());
    let mut okm = Zeroizing::new([0u8; 32]);
    hk.expand(WRAP_INFO, &mut okm[..])
        .map_err(|_| CryptoError::KeyDerivationFailed)?;

    Ok(SymmetricKey::from_bytes(*okm))
}

/// Wrap `key` so only the holder of `recipient`'s secret can recover it.
pub fn wrap_key(
    key: &SymmetricKey,
    recipient: &EncryptionPublicKey,
) -> Result<WrappedKey, CryptoError> {
    let recipient_point = recipient.to_point()?;

    let ephemeral = EphemeralSecret::random(&mut OsRng);
    let ephemeral_public = compress(&ephemeral.public_key());
    let shared = ephemeral.diffie_hellman(&recipient_point);

    let kek = derive_kek(&shared, &ephemeral_public, recipient.as_bytes())?;
    let (ciphertext, nonce) = symmetric::seal(key.as_bytes(), &kek)?;

    Ok(WrappedKey {
        ephemeral_public_key: ephemeral_public.to_vec(),
        nonce: nonce.to_vec(),
        ciphertext,
    })
}

/// Recover the symmetric key from `wrapped` with the recipient's key pair.
///
/// # Errors
///
/// - `InvalidPublicKey` if the ephemeral key is malformed
/// - `DecryptionFailed` for any other recipient, or tampered input
pub fn unwrap_key(
    wrapped: &WrappedKey,
    recipient: &EncryptionKeyPair,
) -> Result<SymmetricKey, CryptoError> {
    let ephemeral = EncryptionPublicKey::from_slice(&wrapped.ephemeral_public_key)?;
    let ephemeral_point = ephemeral.to_point()?;

    let shared = diffie_hellman(
        recipient.secret.to_nonzero_scalar(),
        ephemeral_point.as_affine(),
    );
    let kek = derive_kek(&shared, ephemeral.as_bytes(), recipient.public_key().as_bytes())?;

    let raw = Zeroizing::new(symmetric::open(&wrapped.ciphertext, &wrapped.nonce, &kek)?);
    SymmetricKey::from_slice(&raw).map_err(|_| CryptoError::DecryptionFailed)
}
