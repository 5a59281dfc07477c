//! Krystara Query - search and team-code decoding
//!
//! Both entry points read an immutable [`EntityGraph`] and render through a
//! [`Translator`], so they are pure and can run concurrently against one
//! snapshot.
//!
//! [`EntityGraph`]: krystara_core::EntityGraph
//! [`Translator`]: krystara_i18n::Translator

mod error;
pub mod search;
pub mod team;

pub use error::{Error, Result};
pub use search::{
    search_tag, sort_key, SearchKind, SearchOptions, Searcher, VariantPrefixes,
};
pub use team::{decode, parse_code, Team, TeamDecoder};
