//! # Record Flow
//!
//! Doctor seals a record for a registered patient, the authority confirms
//! it, and only the patient's key opens it from the chain.

#[cfg(test)]
mod tests {
    use crate::fixtures::{authority, record, transactions};
    use mc_05_patient_index::{
        records_for, transactions_for, IndexError, PatientProfile, PatientRegistry,
    };
    use shared_crypto::{Ed25519KeyPair, EncryptionKeyPair};
    use shared_types::{PayloadShape, Transaction};

    fn profile() -> PatientProfile {
        PatientProfile {
            first_name: "Marie".into(),
            last_name: "Curie".into(),
            birth_date: "1867-11-07".into(),
            insurance_number: "INS-1867".into(),
        }
    }

    #[test]
    fn test_patient_reads_own_records_in_both_shapes() {
        let authority = authority(3);
        let registry = PatientRegistry::ephemeral();
        let patient = EncryptionKeyPair::generate();
        let id = registry.add_patient(&profile(), patient.public_key()).unwrap();
        let doctor = Ed25519KeyPair::generate();

        let whole =
            Transaction::new_record(&record(1), &doctor, &patient.public_key(), PayloadShape::Whole)
                .unwrap();
        let per_field = Transaction::new_record(
            &record(2),
            &doctor,
            &patient.public_key(),
            PayloadShape::PerField,
        )
        .unwrap();
        authority.engine.submit(whole).unwrap();
        authority.engine.submit(per_field).unwrap();
        // Someone else's record fills the block.
        authority.engine.submit(transactions(1).remove(0)).unwrap();
        assert_eq!(authority.engine.height(), 2);

        authority.engine.with_ledger(|ledger| {
            assert_eq!(transactions_for(ledger, &registry, &id).unwrap().len(), 2);

            let set = records_for(ledger, &registry, &id, &patient).unwrap();
            assert!(!set.is_partial());
            let notes: Vec<_> = set.records.iter().map(|r| r.record.notes.clone()).collect();
            assert_eq!(notes, vec![record(1).notes, record(2).notes]);
            assert!(set.records.iter().all(|r| r.block_id == 1));
        });
    }

    #[test]
    fn test_pending_records_are_not_visible() {
        let authority = authority(10);
        let registry = PatientRegistry::ephemeral();
        let patient = EncryptionKeyPair::generate();
        let id = registry.add_patient(&profile(), patient.public_key()).unwrap();

        let doctor = Ed25519KeyPair::generate();
        let tx = Transaction::new_record(&record(1), &doctor, &patient.public_key(), PayloadShape::Whole)
            .unwrap();
        authority.engine.submit(tx).unwrap();

        let result = authority
            .engine
            .with_ledger(|ledger| records_for(ledger, &registry, &id, &patient));
        assert!(matches!(result, Err(IndexError::NoRecords(_))));

        authority.engine.seal_block().unwrap();
        let set = authority
            .engine
            .with_ledger(|ledger| records_for(ledger, &registry, &id, &patient))
            .unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_other_reader_is_denied() {
        let authority = authority(1);
        let registry = PatientRegistry::ephemeral();
        let patient = EncryptionKeyPair::generate();
        let id = registry.add_patient(&profile(), patient.public_key()).unwrap();

        let doctor = Ed25519KeyPair::generate();
        let tx = Transaction::new_record(&record(1), &doctor, &patient.public_key(), PayloadShape::Whole)
            .unwrap();
        authority.engine.submit(tx).unwrap();

        let result = authority.engine.with_ledger(|ledger| {
            records_for(ledger, &registry, &id, &EncryptionKeyPair::generate())
        });
        assert!(matches!(result, Err(IndexError::AccessDenied(_))));
    }

    #[test]
    fn test_registry_profile_roundtrip() {
        let registry = PatientRegistry::ephemeral();
        let id = registry
            .add_patient(&profile(), EncryptionKeyPair::generate().public_key())
            .unwrap();
        assert_eq!(registry.get_patient(&id).unwrap(), profile());
        assert!(matches!(
            registry.add_patient(&profile(), EncryptionKeyPair::generate().public_key()),
            Err(IndexError::AlreadyRegistered(_))
        ));
    }
}
