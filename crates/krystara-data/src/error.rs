//! Error types for krystara-data

use thiserror::Error;

/// Dump loading and graph building error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dump file not found: {0}")]
    NotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("Pass {pass} needs {requires} to have run first")]
    PassOrder {
        pass: &'static str,
        requires: &'static str,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
