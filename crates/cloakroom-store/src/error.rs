//! Error types for ticket store operations.

/// Error type for ticket store operations.
///
/// The in-process store never fails at runtime: misses are `Ok(None)`,
/// not errors. The variants here cover construction-time wiring and
/// leave room for trait implementations backed by external storage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing cache could not be constructed.
    #[error("Cache error: {0}")]
    Cache(#[from] cloakroom_cache::Error),

    /// Failure reported by a store backend outside process memory.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for ticket store operations.
pub type Result<T> = std::result::Result<T, Error>;
