//! Pool configuration.

use serde::{Deserialize, Serialize};

/// Transaction pool configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum pending transactions. `None` means unbounded.
    pub max_pool_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_pool_size: Some(10_000),
        }
    }
}

impl PoolConfig {
    /// Small bounded pool for tests.
    pub fn for_testing() -> Self {
        Self {
            max_pool_size: Some(100),
        }
    }

    /// No capacity limit.
    pub fn unbounded() -> Self {
        Self {
            max_pool_size: None,
        }
    }
}
