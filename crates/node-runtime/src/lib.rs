//! # Node Runtime Library
//!
//! Configuration loading and role wiring for the `node-runtime` binary,
//! exposed as a library for integration tests.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `MC_*` environment variables
//! 2. Authority: load and validate the persisted chain, creating genesis
//!    on first start. Client: discover the authority's signing key.
//! 3. Start background tasks (seal driver and persister, or sync loop)
//! 4. Bind the HTTP gateway
//!
//! Shutdown flips one `watch` channel observed by every task.

pub mod config;
pub mod runtime;

pub use config::{ConfigError, NodeConfig, NodeRole};
pub use runtime::NodeRuntime;
