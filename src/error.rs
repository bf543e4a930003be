//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// `add` was called for a key that is already stored
    #[error("Item {0} already exists")]
    AlreadyExists(String),

    /// The sweep interval must be a positive duration
    #[error("Invalid sweep interval: must be greater than zero")]
    InvalidInterval,

    /// The store was constructed outside of a Tokio runtime
    #[error("No Tokio runtime available to run the expiration sweeper")]
    RuntimeUnavailable,
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
