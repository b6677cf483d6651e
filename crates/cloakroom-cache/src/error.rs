//! Error types for cache construction.

/// Error type for cache construction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured capacity bound was zero.
    #[error("Cache capacity must be at least 1")]
    ZeroCapacity,
}

/// Result type for cache construction.
pub type Result<T> = std::result::Result<T, Error>;
