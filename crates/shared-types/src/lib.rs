//! # Shared Types Crate
//!
//! Ledger entities and their canonical byte encoding.
//!
//! ## Design Principles
//!
//! - **Hash once**: a transaction's hash is computed at creation and never
//!   recomputed for an existing value; validators recompute it only to compare.
//! - **Sign the hash**: signatures always cover the 32-byte hash, and are
//!   attached strictly after it is computed.
//! - **Fixed encoding**: hashes are taken over the big-endian, length-prefixed
//!   layout in [`encoding`], never over JSON.

pub mod encoding;
pub mod entities;
pub mod errors;
pub mod record;

pub use entities::*;
pub use errors::*;
pub use record::{open_record, seal_record, MedicalRecord, PayloadShape};
