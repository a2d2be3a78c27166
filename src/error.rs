//! Error types for the cache pool
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for items, pools and repositories.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key contains a reserved character
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Malformed or out-of-range expiration input
    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),

    /// Unrecognised configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure reported by the backing repository
    #[error("Repository error: {0}")]
    Repository(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache pool.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::InvalidKey("a@b".to_string()).to_string(),
            "Invalid key: \"a@b\""
        );
        assert_eq!(
            CacheError::Repository("connection reset".to_string()).to_string(),
            "Repository error: connection reset"
        );
    }
}
