//! MC-06 API Gateway - HTTP interface of authority and client nodes.
//!
//! # Routes
//!
//! | Route | Authority | Client |
//! |-------|-----------|--------|
//! | `POST /addTransaction` | validate and pool | validate and forward |
//! | `POST /createBlock` | seal pending transactions | - |
//! | `GET /getBlockchain` | full chain | local replica |
//! | `POST /sync` | blocks after `lastBlockHash` | - |
//! | `GET /getPublicKey` | authority signing key | - |
//! | `GET /getTransactionPool` | pending, keyed by hash | - |
//! | `GET /getPatientTransactions` | confirmed, by `patientID` | - |
//! | `POST /addPatient` | register patient | - |
//! | `GET /health` | yes | yes |
//!
//! # Errors
//!
//! Every failure is answered as `{"error": {"kind": ..., "message": ...}}`
//! with the status from [`ApiError::status`].

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod router;
pub mod service;

pub use domain::config::GatewayConfig;
pub use domain::error::{ApiError, GatewayError};
pub use router::{authority_router, client_router, AuthorityState, ClientState};
pub use service::{serve, serve_on};
