//! # Medical Records
//!
//! Envelope encryption of a record into a transaction payload: a fresh
//! symmetric key per record seals the content, and that key is wrapped for
//! the patient.

use crate::entities::{Payload, SealedField, Transaction};
use crate::errors::EntityError;
use serde::{Deserialize, Serialize};
use shared_crypto::{
    open, seal, unwrap_key, wrap_key, Ed25519KeyPair, EncryptionKeyPair, EncryptionPublicKey,
    SymmetricKey, WrappedKey,
};

/// Plaintext content of one medical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub notes: String,
    pub results: String,
}

/// How a record is laid out inside the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadShape {
    /// Whole record JSON sealed once.
    #[default]
    Whole,
    /// Every field sealed separately. Leaks which fields exist and their
    /// approximate lengths.
    PerField,
}

fn seal_field(value: &str, key: &SymmetricKey) -> Result<SealedField, EntityError> {
    let (ciphertext, nonce) = seal(value.as_bytes(), key)?;
    Ok(SealedField {
        ciphertext,
        nonce: nonce.to_vec(),
    })
}

fn open_field(field: &SealedField, key: &SymmetricKey) -> Result<String, EntityError> {
    let bytes = open(&field.ciphertext, &field.nonce, key)?;
    String::from_utf8(bytes).map_err(|_| EntityError::MalformedRecord("field is not utf-8".into()))
}

/// Seal `record` for `recipient` under a fresh symmetric key.
pub fn seal_record(
    record: &MedicalRecord,
    recipient: &EncryptionPublicKey,
    shape: PayloadShape,
) -> Result<(Payload, WrappedKey), EntityError> {
    let key = SymmetricKey::generate();

    let payload = match shape {
        PayloadShape::Whole => {
            let json = serde_json::to_vec(record)
                .map_err(|e| EntityError::MalformedRecord(e.to_string()))?;
            let (ciphertext, nonce) = seal(&json, &key)?;
            Payload::Sealed {
                ciphertext,
                nonce: nonce.to_vec(),
            }
        }
        PayloadShape::PerField => Payload::Fields {
            record_type: seal_field(&record.record_type, &key)?,
            notes: seal_field(&record.notes, &key)?,
            results: seal_field(&record.results, &key)?,
        },
    };

    let wrapped = wrap_key(&key, recipient)?;
    Ok((payload, wrapped))
}

/// Recover a record with the recipient's key pair.
///
/// # Errors
///
/// - `MissingWrappedKey` if the transaction carried no wrapped key
/// - `Crypto(DecryptionFailed)` for any key other than the recipient's
pub fn open_record(
    payload: &Payload,
    wrapped: Option<&WrappedKey>,
    reader: &EncryptionKeyPair,
) -> Result<MedicalRecord, EntityError> {
    let wrapped = wrapped.ok_or(EntityError::MissingWrappedKey)?;
    let key = unwrap_key(wrapped, reader)?;

    match payload {
        Payload::Sealed { ciphertext, nonce } => {
            let json = open(ciphertext, nonce, &key)?;
            serde_json::from_slice(&json).map_err(|e| EntityError::MalformedRecord(e.to_string()))
        }
        Payload::Fields {
            record_type,
            notes,
            results,
        } => Ok(MedicalRecord {
            record_type: open_field(record_type, &key)?,
            notes: open_field(notes, &key)?,
            results: open_field(results, &key)?,
        }),
    }
}

impl Transaction {
    /// Seal `record` for `recipient` and sign it as `doctor`.
    pub fn new_record(
        record: &MedicalRecord,
        doctor: &Ed25519KeyPair,
        recipient: &EncryptionPublicKey,
        shape: PayloadShape,
    ) -> Result<Self, EntityError> {
        let (payload, wrapped) = seal_record(record, recipient, shape)?;
        let mut tx = Self::new(payload, doctor.public_key(), *recipient, Some(wrapped));
        tx.sign(doctor)?;
        Ok(tx)
    }

    /// Decrypt this transaction's record.
    pub fn open_record(&self, reader: &EncryptionKeyPair) -> Result<MedicalRecord, EntityError> {
        open_record(&self.payload, self.wrapped_key.as_ref(), reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::CryptoError;

    fn record() -> MedicalRecord {
        MedicalRecord {
            record_type: "blood-panel".into(),
            notes: "fasting sample".into(),
            results: "ldl 110".into(),
        }
    }

    #[test]
    fn test_whole_record_roundtrip() {
        let doctor = Ed25519KeyPair::generate();
        let patient = EncryptionKeyPair::generate();

        let tx = Transaction::new_record(&record(), &doctor, &patient.public_key(), PayloadShape::Whole)
            .unwrap();

        assert!(matches!(tx.payload, Payload::Sealed { .. }));
        assert!(tx.verify().is_ok());
        assert_eq!(tx.open_record(&patient).unwrap(), record());
    }

    #[test]
    fn test_per_field_roundtrip() {
        let doctor = Ed25519KeyPair::generate();
        let patient = EncryptionKeyPair::generate();

        let tx =
            Transaction::new_record(&record(), &doctor, &patient.public_key(), PayloadShape::PerField)
                .unwrap();

        assert!(matches!(tx.payload, Payload::Fields { .. }));
        assert_eq!(tx.open_record(&patient).unwrap(), record());
    }

    #[test]
    fn test_other_reader_denied() {
        let patient = EncryptionKeyPair::generate();
        let stranger = EncryptionKeyPair::generate();
        let (payload, wrapped) =
            seal_record(&record(), &patient.public_key(), PayloadShape::Whole).unwrap();

        let result = open_record(&payload, Some(&wrapped), &stranger);
        assert_eq!(result, Err(EntityError::Crypto(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_missing_wrapped_key() {
        let patient = EncryptionKeyPair::generate();
        let (payload, _) =
            seal_record(&record(), &patient.public_key(), PayloadShape::Whole).unwrap();

        assert_eq!(
            open_record(&payload, None, &patient),
            Err(EntityError::MissingWrappedKey)
        );
    }

    #[test]
    fn test_record_json_uses_type_key() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["type"], "blood-panel");
    }
}
