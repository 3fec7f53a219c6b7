//! Storage Adapters
//!
//! Implementations of the `LedgerStore` trait.

mod file;
mod memory;

pub use file::JsonFileLedgerStore;
pub use memory::InMemoryLedgerStore;
