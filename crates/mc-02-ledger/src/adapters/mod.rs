//! # Adapters

pub mod storage;
