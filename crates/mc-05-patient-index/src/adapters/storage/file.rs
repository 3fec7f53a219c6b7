use crate::domain::StoredPatient;
use crate::error::IndexError;
use crate::ports::outbound::PatientStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sealed patient list persisted as one JSON document.
///
/// Saves go through a sibling temp file renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFilePatientStore {
    path: PathBuf,
}

fn store_error(e: impl std::fmt::Display) -> IndexError {
    IndexError::Store(e.to_string())
}

impl JsonFilePatientStore {
    /// Create a store at the given path. The file need not exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PatientStore for JsonFilePatientStore {
    fn load(&self) -> Result<Vec<StoredPatient>, IndexError> {
        if !self.path.exists() {
            info!("[mc-05] No existing patient file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path).map_err(store_error)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let patients: Vec<StoredPatient> = serde_json::from_slice(&bytes).map_err(store_error)?;
        info!(
            "[mc-05] Loaded {} patients from {}",
            patients.len(),
            self.path.display()
        );
        Ok(patients)
    }

    fn save(&self, patients: &[StoredPatient]) -> Result<(), IndexError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(store_error)?;
            }
        }

        let json = serde_json::to_vec_pretty(patients).map_err(store_error)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(store_error)?;
        fs::rename(&tmp, &self.path).map_err(store_error)?;

        debug!("[mc-05] Saved {} patients to {}", patients.len(), self.path.display());
        Ok(())
    }
}
