//! Per-patient views over the confirmed ledger.

use crate::domain::PatientId;
use crate::error::IndexError;
use crate::registry::PatientRegistry;
use mc_02_ledger::Ledger;
use serde::Serialize;
use shared_crypto::EncryptionKeyPair;
use shared_types::{MedicalRecord, Transaction};
use tracing::{debug, warn};

/// A decrypted record with its on-chain position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub transaction_hash: String,
    pub block_id: u64,
    pub timestamp: i64,
    pub record: MedicalRecord,
}

/// Records a reader could open, plus a count of those it could not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    pub records: Vec<PatientRecord>,
    pub skipped: usize,
}

impl RecordSet {
    pub fn is_partial(&self) -> bool {
        self.skipped > 0
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Confirmed transactions addressed to the patient, in chain order.
pub fn transactions_for(
    ledger: &Ledger,
    registry: &PatientRegistry,
    id: &PatientId,
) -> Result<Vec<Transaction>, IndexError> {
    let recipient = registry.public_key_of(id)?;
    Ok(ledger
        .transactions()
        .filter(|tx| tx.recipient_identity == recipient)
        .cloned()
        .collect())
}

/// Decrypt every confirmed record for the patient that `reader` can open.
pub fn records_for(
    ledger: &Ledger,
    registry: &PatientRegistry,
    id: &PatientId,
    reader: &EncryptionKeyPair,
) -> Result<RecordSet, IndexError> {
    let recipient = registry.public_key_of(id)?;

    let mut set = RecordSet::default();
    let mut found = 0usize;
    for block in ledger.blocks() {
        for tx in block.transactions.iter().filter(|tx| tx.recipient_identity == recipient) {
            found += 1;
            match tx.open_record(reader) {
                Ok(record) => set.records.push(PatientRecord {
                    transaction_hash: tx.hash_hex(),
                    block_id: block.id,
                    timestamp: tx.timestamp,
                    record,
                }),
                Err(e) => {
                    debug!("[mc-05] Skipping record {}: {}", tx.hash_hex(), e);
                    set.skipped += 1;
                }
            }
        }
    }

    if found == 0 {
        return Err(IndexError::NoRecords(id.to_string()));
    }
    if set.records.is_empty() {
        warn!(
            target: "security",
            "[mc-05] No record of patient {} opened with supplied key ({} tried)",
            id,
            found
        );
        return Err(IndexError::AccessDenied(id.to_string()));
    }
    Ok(set)
}
