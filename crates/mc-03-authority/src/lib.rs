//! # Authority Engine Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! The single writer of the ledger. Admits doctor-signed transactions into
//! the pool and seals them into authority-signed blocks when the pool reaches
//! the threshold or the block interval elapses.
//!
//! ## State Machine
//!
//! ```text
//! [Accumulating] ──pool ≥ threshold──→ [Sealing] ──→ [Accumulating]
//!       │                                  ↑
//!       └──interval elapsed, pool > 0──────┘
//! ```
//!
//! ## Concurrency
//!
//! Pool and ledger sit behind one `parking_lot::Mutex`. Drain, build, sign
//! and append happen in one critical section, and a threshold crossing seals
//! inside the same critical section as the `add` that caused it. Verifying
//! signatures happens before the lock is taken; disk writes happen after it
//! is released, on the persister task.
//!
//! ## Module Structure
//!
//! ```text
//! domain/    - genesis construction
//! ports/     - BlockSigner, Clock
//! adapters/  - KeyPairSigner, SystemClock, ManualClock
//! engine     - AuthorityEngine
//! service    - seal driver, persister, startup
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{KeyPairSigner, ManualClock, SystemClock};
pub use config::AuthorityConfig;
pub use engine::{AuthorityEngine, SubmitOutcome};
pub use error::{AuthorityError, Result};
pub use ports::{BlockSigner, Clock, SignerError};
pub use service::{bootstrap_ledger, spawn_persister, spawn_seal_driver, AuthorityHandle};

/// Default pool size that triggers an immediate seal.
pub const DEFAULT_SEAL_THRESHOLD: usize = 10;

/// Default maximum seconds between blocks while transactions are pending.
pub const DEFAULT_MAX_BLOCK_INTERVAL_SECS: u64 = 300;

/// Default seal driver tick.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;
