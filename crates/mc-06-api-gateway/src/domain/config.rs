//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default HTTP port of the authority node.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to
    pub http_addr: SocketAddr,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_HTTP_PORT),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl GatewayConfig {
    /// Loopback on an ephemeral port, small body limit.
    pub fn for_testing() -> Self {
        Self {
            http_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
            max_body_bytes: 64 * 1024,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes cannot be 0".into());
        }
        Ok(())
    }
}
