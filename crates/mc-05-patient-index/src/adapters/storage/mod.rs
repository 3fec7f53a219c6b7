//! Storage Adapters
//!
//! Implementations of the `PatientStore` trait.

mod file;
mod memory;

pub use file::JsonFilePatientStore;
pub use memory::InMemoryPatientStore;
