//! # Domain Layer - Ledger

pub mod errors;
pub mod ledger;
pub mod validator;
