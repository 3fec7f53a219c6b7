//! Patient domain types

mod patient;

pub use patient::{EncryptedProfile, PatientId, PatientProfile, StoredPatient};
