use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use shared_crypto::{hash_identifier, open, seal, EncryptionPublicKey, SymmetricKey};
use shared_types::SealedField;
use std::fmt;

/// Patient lookup key: lowercase hex SHA-256 of the insurance number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    pub fn from_insurance_number(insurance_number: &str) -> Self {
        Self(hash_identifier(insurance_number.trim()))
    }

    /// Wrap an id received from a caller. Normalized to lowercase.
    pub fn from_hex(hex_id: &str) -> Self {
        Self(hex_id.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext patient profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub first_name: String,
    pub last_name: String,
    /// ISO-8601 date, e.g. `1980-04-12`.
    pub birth_date: String,
    pub insurance_number: String,
}

impl PatientProfile {
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.insurance_number.trim().is_empty() {
            return Err(IndexError::InvalidProfile("insurance number is empty".into()));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(IndexError::InvalidProfile("name is empty".into()));
        }
        Ok(())
    }

    pub fn id(&self) -> PatientId {
        PatientId::from_insurance_number(&self.insurance_number)
    }
}

/// Profile with every field sealed under the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedProfile {
    pub first_name: SealedField,
    pub last_name: SealedField,
    pub birth_date: SealedField,
    pub insurance_number: SealedField,
}

fn seal_str(value: &str, key: &SymmetricKey) -> Result<SealedField, IndexError> {
    let (ciphertext, nonce) = seal(value.as_bytes(), key)?;
    Ok(SealedField {
        ciphertext,
        nonce: nonce.to_vec(),
    })
}

fn open_str(field: &SealedField, key: &SymmetricKey) -> Result<String, IndexError> {
    let bytes = open(&field.ciphertext, &field.nonce, key)?;
    String::from_utf8(bytes).map_err(|_| IndexError::InvalidProfile("field is not utf-8".into()))
}

impl EncryptedProfile {
    pub fn seal(profile: &PatientProfile, key: &SymmetricKey) -> Result<Self, IndexError> {
        Ok(Self {
            first_name: seal_str(&profile.first_name, key)?,
            last_name: seal_str(&profile.last_name, key)?,
            birth_date: seal_str(&profile.birth_date, key)?,
            insurance_number: seal_str(&profile.insurance_number, key)?,
        })
    }

    pub fn open(&self, key: &SymmetricKey) -> Result<PatientProfile, IndexError> {
        Ok(PatientProfile {
            first_name: open_str(&self.first_name, key)?,
            last_name: open_str(&self.last_name, key)?,
            birth_date: open_str(&self.birth_date, key)?,
            insurance_number: open_str(&self.insurance_number, key)?,
        })
    }
}

/// Registry entry as persisted: id and key in the clear, profile sealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPatient {
    pub id: PatientId,
    pub public_key: EncryptionPublicKey,
    pub profile: EncryptedProfile,
}
