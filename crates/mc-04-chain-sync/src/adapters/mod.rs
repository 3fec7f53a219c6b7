//! # Adapters

mod http;

pub use http::HttpAuthorityConnection;
