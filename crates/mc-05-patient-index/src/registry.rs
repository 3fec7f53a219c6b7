//! Patient registry backed by a [`PatientStore`].

use crate::adapters::storage::InMemoryPatientStore;
use crate::domain::{EncryptedProfile, PatientId, PatientProfile, StoredPatient};
use crate::error::IndexError;
use crate::ports::PatientStore;
use parking_lot::RwLock;
use shared_crypto::{EncryptionPublicKey, SymmetricKey};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Patient registry keyed by [`PatientId`].
///
/// Profiles are sealed field by field under the registry key on insert and
/// opened on read. Only the id and public key are held in the clear. Every
/// registration is written through to the store before it is visible.
pub struct PatientRegistry {
    key: SymmetricKey,
    store: Arc<dyn PatientStore>,
    patients: RwLock<BTreeMap<PatientId, StoredPatient>>,
}

impl PatientRegistry {
    /// Registry over an in-memory store.
    pub fn new(key: SymmetricKey) -> Self {
        Self {
            key,
            store: Arc::new(InMemoryPatientStore::new()),
            patients: RwLock::new(BTreeMap::new()),
        }
    }

    /// Registry with a fresh random key. Profiles do not outlive it.
    pub fn ephemeral() -> Self {
        Self::new(SymmetricKey::generate())
    }

    /// Registry reloaded from `store`.
    ///
    /// # Errors
    ///
    /// - `Store` if the store cannot be read
    /// - `Crypto` if a stored profile does not open under `key`
    /// - `InvalidProfile` if a stored id does not match its profile
    pub fn open(key: SymmetricKey, store: Arc<dyn PatientStore>) -> Result<Self, IndexError> {
        let mut patients = BTreeMap::new();
        for stored in store.load()? {
            let profile = stored.profile.open(&key).map_err(|e| {
                warn!(
                    target: "security",
                    "[mc-05] Stored profile {} does not open under the registry key",
                    stored.id
                );
                e
            })?;
            if profile.id() != stored.id {
                return Err(IndexError::InvalidProfile(format!(
                    "stored id {} does not match its profile",
                    stored.id
                )));
            }
            patients.insert(stored.id.clone(), stored);
        }
        info!("[mc-05] Patient registry opened with {} patients", patients.len());
        Ok(Self {
            key,
            store,
            patients: RwLock::new(patients),
        })
    }

    pub fn len(&self) -> usize {
        self.patients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.read().is_empty()
    }

    pub fn contains(&self, id: &PatientId) -> bool {
        self.patients.read().contains_key(id)
    }

    /// Register a patient and persist the sealed profile.
    ///
    /// # Errors
    ///
    /// - `InvalidProfile` if required fields are blank
    /// - `AlreadyRegistered` if the insurance number is taken
    /// - `Store` if persisting failed; the patient is not registered
    pub fn add_patient(
        &self,
        profile: &PatientProfile,
        public_key: EncryptionPublicKey,
    ) -> Result<PatientId, IndexError> {
        profile.validate()?;
        let id = profile.id();
        // Seal before taking the write lock.
        let sealed = EncryptedProfile::seal(profile, &self.key)?;

        let mut patients = self.patients.write();
        if patients.contains_key(&id) {
            debug!("[mc-05] Rejected duplicate patient {}", id);
            return Err(IndexError::AlreadyRegistered(id.to_string()));
        }
        patients.insert(
            id.clone(),
            StoredPatient {
                id: id.clone(),
                public_key,
                profile: sealed,
            },
        );

        let snapshot: Vec<StoredPatient> = patients.values().cloned().collect();
        if let Err(e) = self.store.save(&snapshot) {
            patients.remove(&id);
            error!("[mc-05] Failed to persist patient {}: {}", id, e);
            return Err(e);
        }
        info!("[mc-05] Registered patient {}", id);
        Ok(id)
    }

    pub fn get_patient(&self, id: &PatientId) -> Result<PatientProfile, IndexError> {
        let sealed = self
            .patients
            .read()
            .get(id)
            .map(|entry| entry.profile.clone())
            .ok_or_else(|| IndexError::UnknownPatient(id.to_string()))?;
        sealed.open(&self.key)
    }

    /// Encryption key records for this patient are addressed to.
    pub fn public_key_of(&self, id: &PatientId) -> Result<EncryptionPublicKey, IndexError> {
        self.patients
            .read()
            .get(id)
            .map(|entry| entry.public_key)
            .ok_or_else(|| IndexError::UnknownPatient(id.to_string()))
    }
}

impl std::fmt::Debug for PatientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientRegistry")
            .field("patients", &self.len())
            .finish_non_exhaustive()
    }
}
