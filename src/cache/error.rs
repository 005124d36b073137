//! Cache error types

use thiserror::Error;

/// Errors returned by cache store operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Only GET request identities can be stored
    #[error("Cannot store a response for a {method} request")]
    MethodNotCacheable { method: String },

    /// Storage backend failure (I/O, quota, serialization, ...)
    #[error("Cache backend error: {0}")]
    Backend(String),
}
