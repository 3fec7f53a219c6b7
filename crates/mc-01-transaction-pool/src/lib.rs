//! # Transaction Pool Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Holds signed transactions between acceptance and sealing. The pool does
//! no cryptographic checks of its own; callers verify before `add`.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | No duplicate hashes | `TransactionPool::add` |
//! | Deterministic drain order | arrival sequence in `TransactionPool::order` |
//! | Drained transactions never lost on a failed seal | `TransactionPool::restore` |
//!
//! ## Lifecycle
//!
//! ```text
//! [PENDING] ──drain_all──→ (sealing) ──sealed──→ [GONE]
//!                               │
//!                               └── seal failed ──restore──→ [PENDING, ahead of newer]
//! ```
//!
//! The pool is not internally synchronized. The authority engine owns it
//! behind the same lock as the ledger.

pub mod domain;

pub use domain::*;
