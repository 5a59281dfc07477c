//! Krystara Hub - snapshot swap point and index configuration
//!
//! The hub ties the other crates together for a long-running service:
//!
//! - [`IndexConfig`] says where the dumps and translation tables live
//! - [`Snapshot`] is one immutable graph and translator pair built from them
//! - [`Hub`] serves the current snapshot and swaps in new ones on refresh
//!
//! ```rust,ignore
//! use krystara_hub::{Hub, IndexConfig};
//!
//! let config = IndexConfig::load("index.ron")?;
//! let hub = Hub::from_config(&config)?;
//!
//! // per request
//! let team = hub.snapshot().decode_team("1075,6251,6699,6007", "en")?;
//!
//! // periodically
//! hub.reload_if_changed(&config)?;
//! ```

mod config;
mod error;
mod hub;
mod snapshot;

pub use config::{IndexConfig, SearchConfig};
pub use error::{Error, Result};
pub use hub::Hub;
pub use snapshot::Snapshot;
