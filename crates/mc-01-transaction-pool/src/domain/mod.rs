//! # Domain Layer - Transaction Pool
//!
//! - `config`: `PoolConfig`
//! - `pool`: `TransactionPool`
//! - `errors`: `PoolError`

pub mod config;
pub mod errors;
pub mod pool;

pub use config::*;
pub use errors::*;
pub use pool::*;
