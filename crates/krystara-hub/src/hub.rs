//! Hub - the swap point between data refreshes and readers
//!
//! The hub owns the current [`Snapshot`] behind an `RwLock<Arc<_>>`.
//! Readers take the read lock only long enough to clone the `Arc`, so a
//! long query never blocks a swap and a swap never changes data under a
//! running query.
//!
//! ## Refreshing
//!
//! - [`Hub::swap`] installs a snapshot built elsewhere
//! - [`Hub::reload`] builds a fresh snapshot from an [`IndexConfig`]
//! - [`Hub::reload_if_changed`] reloads only when a source file is newer
//!   than the last load
//!
//! A failed build leaves the current snapshot in place.

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::SystemTime;

/// Holds the snapshot every query runs against
///
/// # Example
///
/// ```
/// use krystara_data::fixtures;
/// use krystara_hub::{Hub, Snapshot};
/// use krystara_i18n::Translator;
///
/// let snapshot = Snapshot::new(fixtures::graph().unwrap(), Translator::new("en"));
/// let hub = Hub::new(snapshot);
/// assert_eq!(hub.version(), 1);
///
/// let before = hub.snapshot();
/// let version = hub.swap(Snapshot::new(fixtures::graph().unwrap(), Translator::new("en")));
/// assert_eq!(version, 2);
///
/// // readers that took the old snapshot keep it
/// assert_eq!(before.version(), 1);
/// assert_eq!(hub.snapshot().version(), 2);
/// ```
#[derive(Debug)]
pub struct Hub {
    current: RwLock<Arc<Snapshot>>,
    /// Newest source modification time seen by the last reload
    loaded_at: Mutex<Option<SystemTime>>,
}

impl Hub {
    /// Create a hub serving `snapshot` as version 1
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot.with_version(1))),
            loaded_at: Mutex::new(None),
        }
    }

    /// Build the first snapshot from `config`
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        let stamp = newest_modification(config)?;
        let hub = Self::new(Snapshot::build(config)?);
        hub.set_loaded_at(stamp);
        tracing::info!(version = 1, "hub initialized");
        Ok(hub)
    }

    /// The current snapshot
    ///
    /// The returned `Arc` stays valid across later swaps.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Version of the current snapshot
    pub fn version(&self) -> u64 {
        self.snapshot().version()
    }

    /// Install a new snapshot, returning its version
    pub fn swap(&self, snapshot: Snapshot) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = current.version() + 1;
        *current = Arc::new(snapshot.with_version(version));
        tracing::info!(version, "snapshot swapped");
        version
    }

    /// Build a fresh snapshot from `config` and swap it in
    ///
    /// On error the current snapshot keeps serving.
    pub fn reload(&self, config: &IndexConfig) -> Result<u64> {
        let stamp = newest_modification(config)?;
        let snapshot = Snapshot::build(config).inspect_err(|err| {
            tracing::warn!(error = %err, "reload failed, keeping current snapshot");
        })?;
        let version = self.swap(snapshot);
        self.set_loaded_at(stamp);
        Ok(version)
    }

    /// Reload only if a source changed since the last load
    ///
    /// Returns the new version, or `None` when nothing changed. A hub that
    /// was never loaded from a config always reloads.
    pub fn reload_if_changed(&self, config: &IndexConfig) -> Result<Option<u64>> {
        let stamp = newest_modification(config)?;
        let loaded_at = *self.loaded_at.lock().unwrap_or_else(PoisonError::into_inner);
        if loaded_at.is_some_and(|seen| stamp <= Some(seen)) {
            tracing::debug!("sources unchanged, skipping reload");
            return Ok(None);
        }
        self.reload(config).map(Some)
    }

    fn set_loaded_at(&self, stamp: Option<SystemTime>) {
        *self.loaded_at.lock().unwrap_or_else(PoisonError::into_inner) = stamp;
    }
}

/// Newest modification time across the config's sources
///
/// Directories count their direct entries. Missing sources are skipped;
/// the build reports them.
fn newest_modification(config: &IndexConfig) -> Result<Option<SystemTime>> {
    let mut newest = None;
    for source in config.sources() {
        if !source.exists() {
            continue;
        }
        newest = newest.max(Some(modified(source)?));
        if source.is_dir() {
            let entries = fs::read_dir(source).map_err(|err| stat_error(source, err))?;
            for entry in entries.filter_map(|entry| entry.ok()) {
                newest = newest.max(Some(modified(&entry.path())?));
            }
        }
    }
    Ok(newest)
}

fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|err| stat_error(path, err))
}

fn stat_error(path: &Path, source: std::io::Error) -> Error {
    Error::Stat {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krystara_data::fixtures;
    use krystara_i18n::{Translator, BASE_LOCALE};
    use std::path::PathBuf;
    use std::time::Duration;

    fn empty_snapshot() -> Snapshot {
        Snapshot::new(fixtures::graph().unwrap(), Translator::new(BASE_LOCALE))
    }

    /// Write the fixture dumps and tables into `dir` and return a config for them
    fn write_sources(dir: &Path) -> IndexConfig {
        let translations = dir.join("translations");
        fs::create_dir(&translations).unwrap();
        fs::write(dir.join("World.json"), fixtures::world_json().to_string()).unwrap();
        fs::write(dir.join("User.json"), fixtures::user_json().to_string()).unwrap();
        for locale in ["en", "de"] {
            let table = fixtures::translations(locale).unwrap();
            fs::write(translations.join(format!("{}.json", locale)), table).unwrap();
        }
        let mut config = IndexConfig::default();
        config.resolve_relative(dir);
        config
    }

    fn touch_later(path: &PathBuf) {
        let file = fs::File::options().write(true).open(path).unwrap();
        let later = SystemTime::now() + Duration::from_secs(60);
        file.set_modified(later).unwrap();
    }

    #[test]
    fn test_swap_increments_version() {
        let hub = Hub::new(empty_snapshot());
        assert_eq!(hub.version(), 1);
        assert_eq!(hub.swap(empty_snapshot()), 2);
        assert_eq!(hub.swap(empty_snapshot()), 3);
        assert_eq!(hub.snapshot().version(), 3);
    }

    #[test]
    fn test_old_snapshot_survives_swap() {
        let hub = Hub::new(empty_snapshot());
        let old = hub.snapshot();
        hub.swap(empty_snapshot());
        assert_eq!(old.version(), 1);
        assert!(!Arc::ptr_eq(&old, &hub.snapshot()));
        assert!(old.graph().troop(krystara_core::EntityId(6000)).is_some());
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let hub = Arc::new(Hub::new(empty_snapshot()));
        let troop_count = hub.snapshot().graph().troops.len();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let hub = Arc::clone(&hub);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| {
                            let snapshot = hub.snapshot();
                            assert_eq!(snapshot.graph().troops.len(), troop_count);
                            snapshot.version()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for _ in 0..5 {
            hub.swap(empty_snapshot());
        }
        for reader in readers {
            let versions = reader.join().unwrap();
            assert!(versions.windows(2).all(|w| w[0] <= w[1]));
        }
        assert_eq!(hub.version(), 6);
    }

    #[test]
    fn test_from_config_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_sources(dir.path());

        let hub = Hub::from_config(&config).unwrap();
        let snapshot = hub.snapshot();
        assert_eq!(snapshot.translator().locales().count(), 2);
        assert_eq!(hub.reload(&config).unwrap(), 2);
    }

    #[test]
    fn test_reload_if_changed() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_sources(dir.path());
        let hub = Hub::from_config(&config).unwrap();

        assert_eq!(hub.reload_if_changed(&config).unwrap(), None);

        touch_later(&config.translations_dir.join("de.json"));
        assert_eq!(hub.reload_if_changed(&config).unwrap(), Some(2));
        assert_eq!(hub.reload_if_changed(&config).unwrap(), None);
    }

    #[test]
    fn test_hub_without_config_always_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_sources(dir.path());
        let hub = Hub::new(empty_snapshot());
        assert_eq!(hub.reload_if_changed(&config).unwrap(), Some(2));
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_sources(dir.path());
        let hub = Hub::from_config(&config).unwrap();

        fs::write(&config.world_path, "{ not json").unwrap();
        assert!(matches!(hub.reload(&config), Err(Error::Data(_))));
        assert_eq!(hub.version(), 1);
        assert!(hub.snapshot().graph().troop(krystara_core::EntityId(6251)).is_some());
    }

    #[test]
    fn test_configured_locales_are_retained() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_sources(dir.path());
        config.locales = vec!["fr".to_string()];

        let hub = Hub::from_config(&config).unwrap();
        let locales: Vec<_> = hub.snapshot().translator().locales().map(String::from).collect();
        assert_eq!(locales, vec!["en"]);
    }
}
