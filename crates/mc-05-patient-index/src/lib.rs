//! # Patient Index Subsystem
//!
//! **Subsystem ID:** 5
//!
//! ## Purpose
//!
//! Off-chain registry of patients and lookup of their on-chain records.
//!
//! ## Privacy
//!
//! | Concern | Handling |
//! |---------|----------|
//! | Lookup key | hex SHA-256 of the insurance number, never the number itself |
//! | Stored profile | every field sealed under the registry key |
//! | Record content | only readable with the patient's encryption key |
//! | Persistence | `PatientStore` only ever receives sealed profiles |
//!
//! `records_for` separates "patient has no records" (`NoRecords`) from
//! "records exist but this reader can open none of them" (`AccessDenied`).
//! Records that fail individually are skipped and counted.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod records;
pub mod registry;

pub use adapters::storage::{InMemoryPatientStore, JsonFilePatientStore};
pub use domain::{PatientId, PatientProfile, StoredPatient};
pub use error::IndexError;
pub use records::{records_for, transactions_for, PatientRecord, RecordSet};
pub use ports::PatientStore;
pub use registry::PatientRegistry;
