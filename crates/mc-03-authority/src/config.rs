//! Configuration types for the authority engine

use crate::error::{AuthorityError, Result};
use mc_01_transaction_pool::PoolConfig;
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for sealing
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Pool size that seals immediately
    pub seal_threshold: usize,

    /// Seal a non-empty pool once this long has passed since the last block
    pub max_block_interval_secs: u64,

    /// How often the seal driver checks the interval condition
    pub check_interval_secs: u64,

    /// Pool capacity (None = unbounded)
    pub max_pool_size: Option<usize>,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            seal_threshold: crate::DEFAULT_SEAL_THRESHOLD,
            max_block_interval_secs: crate::DEFAULT_MAX_BLOCK_INTERVAL_SECS,
            check_interval_secs: crate::DEFAULT_CHECK_INTERVAL_SECS,
            max_pool_size: Some(10_000),
        }
    }
}

impl AuthorityConfig {
    /// Short intervals for tests
    pub fn for_testing() -> Self {
        Self {
            seal_threshold: 3,
            max_block_interval_secs: 2,
            check_interval_secs: 1,
            max_pool_size: Some(100),
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.seal_threshold == 0 {
            return Err(AuthorityError::InvalidConfig(
                "seal_threshold must be at least 1".into(),
            ));
        }
        if self.check_interval_secs == 0 {
            return Err(AuthorityError::InvalidConfig(
                "check_interval_secs must be at least 1".into(),
            ));
        }
        if let Some(max) = self.max_pool_size {
            if max < self.seal_threshold {
                return Err(AuthorityError::InvalidConfig(format!(
                    "max_pool_size {} is below seal_threshold {}",
                    max, self.seal_threshold
                )));
            }
        }
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_pool_size: self.max_pool_size,
        }
    }
}
