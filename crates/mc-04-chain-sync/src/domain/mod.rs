//! # Domain Layer - Chain Sync

pub mod errors;
pub mod protocol;

pub use errors::SyncError;
pub use protocol::{PublicKeyResponse, SyncRequest, SyncResponse};
