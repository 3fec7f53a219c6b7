//! Port definitions for the authority engine

pub mod outbound;

pub use outbound::{BlockSigner, Clock, SignerError};
