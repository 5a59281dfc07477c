//! Index Configuration - where the dumps live and how to serve them
//!
//! An [`IndexConfig`] is a RON document. Every field has a default, so a
//! config only needs to name what differs:
//!
//! ```ron
//! (
//!     world_path: "dumps/World.json",
//!     user_path: "dumps/User.json",
//!     translations_dir: "dumps/translations",
//!     locales: ["en", "de", "fr"],
//!     search: (
//!         variants: (warband: ["Warband"], skins: ["Skin", "Holiday"]),
//!     ),
//! )
//! ```
//!
//! Relative paths in a file loaded with [`IndexConfig::load`] are resolved
//! against the directory the file is in.

use crate::error::{Error, Result};
use krystara_i18n::BASE_LOCALE;
use krystara_query::VariantPrefixes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Search settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Reference-name prefixes of warband copies and skins
    pub variants: VariantPrefixes,
}

/// Configuration for building a [`Snapshot`](crate::Snapshot)
///
/// # Example
///
/// ```
/// use krystara_hub::IndexConfig;
/// use std::path::Path;
///
/// let config: IndexConfig = r#"(world_path: "data/World.json", locales: ["en", "de"])"#
///     .parse()
///     .unwrap();
/// assert_eq!(config.world_path, Path::new("data/World.json"));
/// assert_eq!(config.user_path, Path::new("User.json"));
/// assert_eq!(config.base_locale, "en");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Game-data dump
    pub world_path: PathBuf,
    /// User dump with the economy model
    pub user_path: PathBuf,
    /// Directory of `<locale>.json` translation tables
    pub translations_dir: PathBuf,
    /// Locale every other locale falls back to
    pub base_locale: String,
    /// Locales to serve besides the base; empty serves every table found
    pub locales: Vec<String>,
    pub search: SearchConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            world_path: PathBuf::from("World.json"),
            user_path: PathBuf::from("User.json"),
            translations_dir: PathBuf::from("translations"),
            base_locale: BASE_LOCALE.to_string(),
            locales: Vec::new(),
            search: SearchConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Read a config file, resolving relative paths against its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: IndexConfig = content.parse()?;
        if let Some(dir) = path.parent() {
            config.resolve_relative(dir);
        }
        tracing::debug!(path = %path.display(), "loaded index config");
        Ok(config)
    }

    /// Prefix every relative path with `dir`
    pub fn resolve_relative(&mut self, dir: &Path) {
        for path in [
            &mut self.world_path,
            &mut self.user_path,
            &mut self.translations_dir,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// The files and directories a snapshot is built from
    pub fn sources(&self) -> [&Path; 3] {
        [&self.world_path, &self.user_path, &self.translations_dir]
    }
}

impl FromStr for IndexConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }
}
