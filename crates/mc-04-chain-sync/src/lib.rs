//! # Chain Sync Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Brings read-only client ledgers up to date with the authority.
//!
//! ```text
//! client                                   authority
//!   │ GET  /getPublicKey ─────────────────────→ │
//!   │ ←──────────────────────── {publicKey}     │
//!   │ POST /sync {lastBlockHash} ─────────────→ │ handle_sync
//!   │ ←──────────────────────────── {blocks}    │
//!   │ validate all, then append all             │
//! ```
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement |
//! |-----------|-------------|
//! | Unknown hash is an error, never an empty answer | `handle_sync` |
//! | Suffix must link to the local tail | `Ledger::append_validated` |
//! | No partial appends | `Ledger::append_validated` |
//! | No network I/O under the ledger lock | `ClientNode::sync_once` |

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::HttpAuthorityConnection;
pub use application::{handle_sync, ClientNode};
pub use config::ClientSyncConfig;
pub use domain::{PublicKeyResponse, SyncError, SyncRequest, SyncResponse};
pub use ports::AuthorityConnection;
