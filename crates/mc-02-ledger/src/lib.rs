//! # Ledger Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Owns the append-only block list and its hash index, validates blocks and
//! whole chains against the authority key, and defines the persistence port
//! the node saves through.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Ids contiguous from 0 | `validator::check_linkage` |
//! | `previous_hash` links to the tail | `validator::check_linkage` |
//! | Index always matches `blocks` | `Ledger::push` is the only writer |
//! | Multi-block appends are all-or-nothing | `Ledger::append_validated` |
//!
//! ## Validation Order
//!
//! 1. Recompute hash → `InvalidHash`
//! 2. Authority signature → `InvalidSignature`
//! 3. Linkage → `LinkageMismatch`
//! 4. Every transaction's shape, hash and sender signature → `InvalidTransaction`
//!
//! ## Module Structure
//!
//! ```text
//! domain/    - Ledger, validator, errors
//! ports/     - LedgerStore (driven port)
//! adapters/  - in-memory and JSON-file stores
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::storage::{InMemoryLedgerStore, JsonFileLedgerStore};
pub use domain::errors::{LedgerError, StoreError, ValidationError};
pub use domain::ledger::Ledger;
pub use domain::validator::{validate_block, validate_chain};
pub use ports::outbound::LedgerStore;
