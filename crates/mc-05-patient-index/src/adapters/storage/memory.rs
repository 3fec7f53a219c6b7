use crate::domain::StoredPatient;
use crate::error::IndexError;
use crate::ports::outbound::PatientStore;
use parking_lot::Mutex;

/// In-memory patient store for tests and ephemeral registries.
#[derive(Debug, Default)]
pub struct InMemoryPatientStore {
    patients: Mutex<Vec<StoredPatient>>,
    fail_saves: Mutex<bool>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `save` fail.
    pub fn set_failing(&self, failing: bool) {
        *self.fail_saves.lock() = failing;
    }

    pub fn snapshot(&self) -> Vec<StoredPatient> {
        self.patients.lock().clone()
    }
}

impl PatientStore for InMemoryPatientStore {
    fn load(&self) -> Result<Vec<StoredPatient>, IndexError> {
        Ok(self.patients.lock().clone())
    }

    fn save(&self, patients: &[StoredPatient]) -> Result<(), IndexError> {
        if *self.fail_saves.lock() {
            return Err(IndexError::Store("store offline".into()));
        }
        *self.patients.lock() = patients.to_vec();
        Ok(())
    }
}
