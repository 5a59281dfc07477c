//! Error types for krystara-i18n

use thiserror::Error;

/// Result type for translation table operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading translation tables
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A table that is not a flat object of strings
    #[error("invalid translation table for {locale}: {source}")]
    InvalidTable {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no translation table for base locale {0}")]
    MissingBase(String),
}
