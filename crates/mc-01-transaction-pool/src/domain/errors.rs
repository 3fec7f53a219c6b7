//! Pool error types.

use thiserror::Error;

/// Transaction pool errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Transaction already exists in the pool.
    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(String),

    /// Pool has reached maximum capacity.
    #[error("Pool full at {capacity} transactions")]
    PoolFull { capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoolError::PoolFull { capacity: 3 };
        assert!(err.to_string().contains('3'));

        let err = PoolError::DuplicateTransaction("abcd".into());
        assert!(err.to_string().contains("Duplicate"));
    }
}
