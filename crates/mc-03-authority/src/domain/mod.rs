//! Domain logic for the authority engine

pub mod genesis;

pub use genesis::create_genesis;
