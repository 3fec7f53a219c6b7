//! # Med-Chain Test Suite
//!
//! Cross-crate flows that no single subsystem crate can test alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs          # Engines, signers, transactions
//! └── integration/
//!     ├── sealing.rs       # Threshold, interval and manual seals
//!     ├── concurrency.rs   # Concurrent submission property
//!     ├── failures.rs      # Signer failure and restore
//!     ├── tampering.rs     # Hash and signature checks on altered blocks
//!     ├── sync.rs          # Authority to client replication
//!     ├── records.rs       # Doctor to patient record flow
//!     └── http.rs          # Both roles over real sockets
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mc-tests
//! cargo test -p mc-tests integration::sync::
//! ```

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod integration;
