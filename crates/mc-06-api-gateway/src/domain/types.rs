//! Request and response bodies.

use mc_05_patient_index::{PatientId, PatientProfile};
use serde::{Deserialize, Serialize};
use shared_crypto::EncryptionPublicKey;

/// Answer to an accepted `POST /addTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub transaction_hash: String,
    /// `pooled`, `sealed` or `forwarded`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pending: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub block_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientQuery {
    #[serde(rename = "patientID")]
    pub patient_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPatientRequest {
    pub profile: PatientProfile,
    pub public_key: EncryptionPublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPatientResponse {
    pub patient_id: PatientId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub role: String,
    pub height: usize,
}
