//! Krystara Data - dump loader and entity graph builder
//!
//! Turns the raw game dumps into a cross-referenced [`EntityGraph`]:
//! - `World.json` and `User.json` parsing
//! - Multi-pass graph construction with fixed [`Pass`] ordering
//! - Release dates, kingdom enrichment and derived collections
//!
//! ```no_run
//! let raw = krystara_data::load("World.json", "User.json")?;
//! let graph = krystara_data::build(&raw)?;
//! println!("{} kingdoms", graph.kingdoms.len());
//! # Ok::<(), krystara_data::Error>(())
//! ```
//!
//! [`EntityGraph`]: krystara_core::EntityGraph

mod builder;
mod error;
mod loader;
pub mod schema;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use builder::{build, GraphBuilder, Pass, NON_CRAFTABLE_WEAPON_IDS};
pub use error::{Error, Result};
pub use loader::{load, Loader, RawData};
pub use schema::{EconomyModel, UserDump, WorldDump};
