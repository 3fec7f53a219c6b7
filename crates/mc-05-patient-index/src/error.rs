//! Error types for the patient index

use shared_crypto::CryptoError;
use thiserror::Error;

/// Patient index errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// No patient with this id.
    #[error("Unknown patient: {0}")]
    UnknownPatient(String),

    /// A patient with this insurance number is already registered.
    #[error("Patient already registered: {0}")]
    AlreadyRegistered(String),

    /// The patient has no confirmed records.
    #[error("No records for patient {0}")]
    NoRecords(String),

    /// Records exist but none could be opened with the supplied key.
    #[error("Access denied to records of patient {0}")]
    AccessDenied(String),

    /// Profile is missing required fields.
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// The patient store could not load or save.
    #[error("Patient store error: {0}")]
    Store(String),

    /// Registry key could not seal or open a profile.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
