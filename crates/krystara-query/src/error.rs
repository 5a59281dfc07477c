//! Error types for krystara-query

use thiserror::Error;

/// Result type for query operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from parsing user input; lookups themselves never fail
#[derive(Debug, Error)]
pub enum Error {
    #[error("empty team code")]
    EmptyCode,

    #[error("invalid team code element {0:?}")]
    InvalidCode(String),

    #[error("unknown search kind {0:?}")]
    UnknownKind(String),
}
