//! Snapshot - one consistent graph and translator pair
//!
//! Queries never see a graph from one data refresh and translations from
//! another: both live in one immutable [`Snapshot`], and the hub swaps whole
//! snapshots.
//!
//! Snapshots hold their data in `Arc`, so cloning one is O(1) and a clone
//! can outlive the swap that replaced it.
//!
//! # Example
//!
//! ```rust,ignore
//! use krystara_hub::{IndexConfig, Snapshot};
//! use krystara_query::{SearchKind, SearchOptions};
//!
//! let config = IndexConfig::load("index.ron")?;
//! let snapshot = Snapshot::build(&config)?;
//!
//! for troop in snapshot.search(SearchKind::Troop, "goblin", "de", &SearchOptions::public()) {
//!     println!("{}", troop.name());
//! }
//! ```

use crate::config::IndexConfig;
use crate::error::Result;
use krystara_core::{EntityGraph, Event, Record, Spoiler, SpoilerKind, TimeSource};
use krystara_i18n::Translator;
use krystara_query::{SearchKind, SearchOptions, Searcher, Team, TeamDecoder, VariantPrefixes};
use std::sync::Arc;

/// An immutable graph and translator, tagged with a version
///
/// `Snapshot` is `Send + Sync`, so one can be shared by every request
/// handler without further locking.
#[derive(Debug, Clone)]
pub struct Snapshot {
    graph: Arc<EntityGraph>,
    translator: Arc<Translator>,
    variants: VariantPrefixes,
    /// Set by the hub on swap
    version: u64,
}

impl Snapshot {
    /// Wrap an already built graph and translator
    pub fn new(graph: EntityGraph, translator: Translator) -> Self {
        Self {
            graph: Arc::new(graph),
            translator: Arc::new(translator),
            variants: VariantPrefixes::default(),
            version: 0,
        }
    }

    /// Load the dumps and translation tables named by `config` and build
    ///
    /// Any fatal problem in the dumps aborts the build; the caller keeps
    /// whatever snapshot it already had.
    pub fn build(config: &IndexConfig) -> Result<Self> {
        let raw = krystara_data::load(&config.world_path, &config.user_path)?;
        let graph = krystara_data::build(&raw)?;

        let mut translator = Translator::load_dir(&config.translations_dir, &config.base_locale)?;
        if !config.locales.is_empty() {
            for locale in config.locales.iter().filter(|l| !translator.has_locale(l)) {
                tracing::warn!(locale = %locale, "configured locale has no translation table");
            }
            translator.retain_locales(&config.locales);
        }

        Ok(Self::new(graph, translator).with_variants(config.search.variants.clone()))
    }

    /// Replace the variant prefixes used by [`Snapshot::searcher`]
    pub fn with_variants(mut self, variants: VariantPrefixes) -> Self {
        self.variants = variants;
        self
    }

    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Version assigned by the hub; `0` until first installed
    pub fn version(&self) -> u64 {
        self.version
    }

    /// A searcher over this snapshot using the wall clock
    pub fn searcher(&self) -> Searcher<'_> {
        Searcher::new(&self.graph, &self.translator).with_variants(self.variants.clone())
    }

    pub fn decoder(&self) -> TeamDecoder<'_> {
        TeamDecoder::new(&self.graph, &self.translator)
    }

    /// Search one kind of entity
    pub fn search(
        &self,
        kind: SearchKind,
        query: &str,
        locale: &str,
        options: &SearchOptions,
    ) -> Vec<Record> {
        self.searcher().search_kind(kind, query, locale, options)
    }

    /// Parse and decode a comma-separated team code
    pub fn decode_team(&self, code: &str, locale: &str) -> Result<Team> {
        Ok(self.decoder().decode_str(code, locale)?)
    }

    /// Releases dated after the clock's "now", earliest first
    pub fn upcoming_spoilers(&self, clock: &dyn TimeSource) -> &[Spoiler] {
        let now = clock.now();
        let first = self.graph.spoilers.partition_point(|s| s.date <= now);
        &self.graph.spoilers[first..]
    }

    /// Events running at the clock's "now"
    pub fn current_events(&self, clock: &dyn TimeSource) -> Vec<&Event> {
        let now = clock.now();
        self.graph
            .events
            .iter()
            .filter(|e| e.window.contains(now))
            .collect()
    }

    /// The released entity a spoiler points at, translated
    ///
    /// Rooms are not indexed, so they yield `None`.
    pub fn spoiler_record(&self, spoiler: &Spoiler, locale: &str) -> Option<Record> {
        let graph = self.graph();
        let translator = self.translator();
        let id = spoiler.id;
        match spoiler.kind {
            SpoilerKind::Troop => graph.troop(id).map(|t| translator.translate(t, graph, locale)),
            SpoilerKind::Kingdom => graph.kingdoms.get(&id).map(|k| translator.translate(k, graph, locale)),
            SpoilerKind::Class => graph.classes.get(&id).map(|c| translator.translate(c, graph, locale)),
            SpoilerKind::Pet => graph.pets.get(&id).map(|p| translator.translate(p, graph, locale)),
            SpoilerKind::Weapon => graph.weapons.get(&id).map(|w| translator.translate(w, graph, locale)),
            SpoilerKind::Room => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krystara_core::{EntityId, EventKind, FixedTime};
    use krystara_data::fixtures;
    use krystara_i18n::BASE_LOCALE;

    fn fixture_snapshot() -> Snapshot {
        let mut translator = Translator::new(BASE_LOCALE);
        for locale in ["en", "de"] {
            translator
                .load_str(locale, &fixtures::translations(locale).unwrap())
                .unwrap();
        }
        Snapshot::new(fixtures::graph().unwrap(), translator)
    }

    #[test]
    fn test_snapshot_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Snapshot>();
    }

    #[test]
    fn test_clone_shares_data() {
        let snapshot = fixture_snapshot();
        let clone = snapshot.clone();
        assert!(Arc::ptr_eq(&snapshot.graph, &clone.graph));
        assert!(Arc::ptr_eq(&snapshot.translator, &clone.translator));
        assert_eq!(snapshot.version(), 0);
    }

    #[test]
    fn test_search_and_decode() {
        let snapshot = fixture_snapshot();
        let found = snapshot.search(SearchKind::Troop, "6251", "en", &SearchOptions::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Bone Dragon");

        let team = snapshot.decode_team("6000, 6251", "de").unwrap();
        assert_eq!(team.troops[0].name(), "Kobold");
        assert!(snapshot.decode_team("", "en").is_err());
    }

    #[test]
    fn test_upcoming_spoilers() {
        let snapshot = fixture_snapshot();
        let clock = FixedTime(fixtures::now());
        let upcoming = snapshot.upcoming_spoilers(&clock);

        let ids: Vec<_> = upcoming.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![EntityId(6007), EntityId(1210), EntityId(6800)]);
        assert!(upcoming.iter().all(|s| s.date > clock.now()));
    }

    #[test]
    fn test_current_events() {
        let snapshot = fixture_snapshot();
        let events = snapshot.current_events(&FixedTime(fixtures::now()));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Kingdom);
        assert_eq!(events[0].kingdom_id, Some(EntityId(3010)));
    }

    #[test]
    fn test_spoiler_record() {
        let snapshot = fixture_snapshot();
        let spoilers = &snapshot.graph().spoilers;
        let troop = spoilers.iter().find(|s| s.id == EntityId(6007)).unwrap();
        let record = snapshot.spoiler_record(troop, "en").unwrap();
        assert_eq!(record.name(), "Infernus");

        let room = spoilers.iter().find(|s| s.kind == SpoilerKind::Room).unwrap();
        assert_eq!(snapshot.spoiler_record(room, "en"), None);
    }
}
