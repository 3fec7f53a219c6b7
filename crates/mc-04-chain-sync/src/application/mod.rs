//! # Application Layer

mod client;
mod handler;

pub use client::ClientNode;
pub use handler::handle_sync;
