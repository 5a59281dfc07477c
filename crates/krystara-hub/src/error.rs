//! Error types for krystara-hub
//!
//! Building a snapshot touches every lower crate, so most variants wrap
//! their errors unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for krystara-hub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in krystara-hub
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid RON
    #[error("invalid config: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Loading or building the entity graph failed
    #[error("data error: {0}")]
    Data(#[from] krystara_data::Error),

    /// Loading translation tables failed
    #[error("translation error: {0}")]
    I18n(#[from] krystara_i18n::Error),

    /// A query could not be parsed
    #[error("query error: {0}")]
    Query(#[from] krystara_query::Error),

    /// Reading a source's modification time failed
    #[error("failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Compile-time check that Error is Send + Sync so reload errors can cross threads.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
