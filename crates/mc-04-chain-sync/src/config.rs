//! # Client Sync Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client node sync configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSyncConfig {
    /// Base URL of the authority node, e.g. `http://127.0.0.1:8080`.
    pub authority_url: String,

    /// Seconds between sync rounds.
    pub sync_interval_secs: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientSyncConfig {
    fn default() -> Self {
        Self {
            authority_url: "http://127.0.0.1:8080".to_string(),
            sync_interval_secs: 10,
            request_timeout_secs: 10,
        }
    }
}

impl ClientSyncConfig {
    /// Create a config for testing (short intervals).
    pub fn for_testing() -> Self {
        Self {
            sync_interval_secs: 1,
            request_timeout_secs: 2,
            ..Self::default()
        }
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
