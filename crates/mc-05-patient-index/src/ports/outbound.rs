//! # Outbound Ports (Driven Ports)
//!
//! Persistence of the registry. Profiles reach the store already sealed, so
//! an adapter never sees plaintext.

use crate::domain::StoredPatient;
use crate::error::IndexError;

/// Load/save of every registered patient.
///
/// Production: `JsonFilePatientStore`
/// Testing: `InMemoryPatientStore`
pub trait PatientStore: Send + Sync {
    /// All persisted patients. Empty if nothing was saved yet.
    fn load(&self) -> Result<Vec<StoredPatient>, IndexError>;

    /// Replace the persisted patient list.
    fn save(&self, patients: &[StoredPatient]) -> Result<(), IndexError>;
}
