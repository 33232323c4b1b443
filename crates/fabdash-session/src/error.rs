//! Error types for session storage operations

/// Errors from session storage operations.
///
/// Malformed stored data is deliberately not represented here: the store
/// recovers from it locally (purge, report absent) instead of surfacing a
/// parse error to the UI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
