//! Error types for cache operations.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-specific errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// No backend registered under this name
    #[error("Unknown cache backend: {0}")]
    UnknownBackend(String),

    /// The backend rejected or failed the operation
    #[error("Backend error: {0}")]
    Backend(String),
}
