//! Free-text search over indexed entities
//!
//! Matching works on *tags*: the text with spaces and apostrophes removed
//! and lowercased, so `"Mab's Guard"` and `"mabsguard"` compare equal.
//!
//! 1. A purely numeric query that equals an id returns exactly that entity.
//! 2. A candidate whose translated name tag equals the query tag is a precise
//!    match and is returned alone.
//! 3. Otherwise every candidate with a lookup key whose tag contains the
//!    query tag is returned, sorted by display name.

use crate::error::Error;
use krystara_core::{
    EntityGraph, EntityId, Indexed, Record, SystemTime, TimeSource, Value, UNKNOWN_NAME,
};
use krystara_i18n::Translator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for matching: no whitespace, no apostrophes, lowercase
pub fn search_tag(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\'' | '\u{2019}'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Key for locale-aware ordering of display names
///
/// Compatibility-decomposes, drops combining marks and lowercases, so
/// `"Éclair"` sorts with `"eclair"` rather than after `"z"`.
pub fn sort_key(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Reference-name prefixes that mark variant entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantPrefixes {
    /// Warband copies of regular troops
    pub warband: Vec<String>,
    /// Cosmetic skins of regular troops
    pub skins: Vec<String>,
}

impl Default for VariantPrefixes {
    fn default() -> Self {
        Self {
            warband: vec!["Warband".to_string()],
            skins: vec!["Skin".to_string()],
        }
    }
}

impl VariantPrefixes {
    fn is_warband(&self, reference_name: &str) -> bool {
        self.warband.iter().any(|p| reference_name.starts_with(p.as_str()))
    }

    fn is_skin(&self, reference_name: &str) -> bool {
        self.skins.iter().any(|p| reference_name.starts_with(p.as_str()))
    }
}

/// Per-query switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Skip entities whose release date is still in the future
    pub released_only: bool,
    pub exclude_warband: bool,
    pub exclude_skins: bool,
    /// Match the display name only, ignoring the other lookup keys
    pub name_only: bool,
}

impl SearchOptions {
    /// What a public lookup usually wants: released, no variants
    pub fn public() -> Self {
        Self {
            released_only: true,
            exclude_warband: true,
            exclude_skins: true,
            name_only: false,
        }
    }
}

pub const TROOP_KEYS: &[&str] = &["reference_name", "kingdom.name", "types", "roles", "spell.description"];
pub const WEAPON_KEYS: &[&str] = &["reference_name", "kingdom.name", "roles", "spell.description"];
pub const KINGDOM_KEYS: &[&str] = &["reference_name", "linked_kingdom.name"];
pub const CLASS_KEYS: &[&str] = &["reference_name", "type", "kingdom.name"];
pub const PET_KEYS: &[&str] = &["reference_name", "kingdom.name", "effect"];
pub const TRAIT_KEYS: &[&str] = &["reference_name", "description"];
pub const TALENT_TREE_KEYS: &[&str] = &["reference_name", "talents.name", "classes.name"];

/// Entity kinds with a typed search entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Troop,
    Weapon,
    Kingdom,
    Class,
    Pet,
    Trait,
    TalentTree,
}

impl SearchKind {
    pub const ALL: [SearchKind; 7] = [
        SearchKind::Troop,
        SearchKind::Weapon,
        SearchKind::Kingdom,
        SearchKind::Class,
        SearchKind::Pet,
        SearchKind::Trait,
        SearchKind::TalentTree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Troop => "troop",
            SearchKind::Weapon => "weapon",
            SearchKind::Kingdom => "kingdom",
            SearchKind::Class => "class",
            SearchKind::Pet => "pet",
            SearchKind::Trait => "trait",
            SearchKind::TalentTree => "talent_tree",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = Error;

    /// Accepts singular and plural forms, `talent-tree` and `talent_tree`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let forms = [
            Some(normalized.as_str()),
            normalized.strip_suffix('s'),
            normalized.strip_suffix("es"),
        ];
        Self::ALL
            .into_iter()
            .find(|kind| forms.contains(&Some(kind.as_str())))
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

static WALL_CLOCK: SystemTime = SystemTime;

/// Search context: what to search in, how to translate, and when "now" is
pub struct Searcher<'a> {
    graph: &'a EntityGraph,
    translator: &'a Translator,
    clock: &'a dyn TimeSource,
    variants: VariantPrefixes,
}

impl<'a> Searcher<'a> {
    pub fn new(graph: &'a EntityGraph, translator: &'a Translator) -> Self {
        Self {
            graph,
            translator,
            clock: &WALL_CLOCK,
            variants: VariantPrefixes::default(),
        }
    }

    pub fn with_clock(mut self, clock: &'a dyn TimeSource) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_variants(mut self, variants: VariantPrefixes) -> Self {
        self.variants = variants;
        self
    }

    /// Search any collection of indexed entities
    ///
    /// `lookup_keys` are dotted record paths matched in addition to the name.
    pub fn search<'c, T, I>(
        &self,
        collection: I,
        query: &str,
        locale: &str,
        options: &SearchOptions,
        lookup_keys: &[&str],
    ) -> Vec<Record>
    where
        T: Indexed + 'c,
        I: IntoIterator<Item = &'c T>,
    {
        let tag = search_tag(query);
        if tag.is_empty() {
            return Vec::new();
        }
        let candidates: Vec<&T> = collection
            .into_iter()
            .filter(|item| item.numeric_id() != Some(EntityId::PLACEHOLDER))
            .collect();

        if let Some(id) = EntityId::parse_numeric(query) {
            if let Some(item) = candidates.iter().find(|item| item.numeric_id() == Some(id)) {
                tracing::debug!(kind = %T::KIND, %id, "numeric id match");
                return vec![self.translator.translate(*item, self.graph, locale)];
            }
        }

        let now = self.clock.now();
        let mut fuzzy = Vec::new();
        for item in candidates {
            if options.released_only && item.release_date().is_some_and(|date| date > now) {
                continue;
            }
            let reference = item.reference_name();
            if (options.exclude_warband && self.variants.is_warband(reference))
                || (options.exclude_skins && self.variants.is_skin(reference))
            {
                continue;
            }

            let record = self.translator.translate(item, self.graph, locale);
            if record.name() == UNKNOWN_NAME {
                continue;
            }
            if search_tag(record.name()) == tag {
                tracing::debug!(kind = %T::KIND, name = record.name(), "precise match");
                return vec![record];
            }
            if matches_any(&record, &tag, options.name_only, lookup_keys) {
                fuzzy.push(record);
            }
        }

        fuzzy.sort_by_cached_key(|record| (sort_key(record.name()), record.id()));
        tracing::debug!(kind = %T::KIND, query, matches = fuzzy.len(), "fuzzy search");
        fuzzy
    }

    /// Dispatch to the typed entry point for `kind`
    pub fn search_kind(
        &self,
        kind: SearchKind,
        query: &str,
        locale: &str,
        options: &SearchOptions,
    ) -> Vec<Record> {
        match kind {
            SearchKind::Troop => self.search_troops(query, locale, options),
            SearchKind::Weapon => self.search_weapons(query, locale, options),
            SearchKind::Kingdom => self.search_kingdoms(query, locale, options),
            SearchKind::Class => self.search_classes(query, locale, options),
            SearchKind::Pet => self.search_pets(query, locale, options),
            SearchKind::Trait => self.search_traits(query, locale, options),
            SearchKind::TalentTree => self.search_talent_trees(query, locale, options),
        }
    }

    pub fn search_troops(&self, query: &str, locale: &str, options: &SearchOptions) -> Vec<Record> {
        let troops = self.graph.troops.iter().filter(|t| !t.is_placeholder());
        self.search(troops, query, locale, options, TROOP_KEYS)
    }

    pub fn search_weapons(&self, query: &str, locale: &str, options: &SearchOptions) -> Vec<Record> {
        self.search(self.graph.weapons.iter(), query, locale, options, WEAPON_KEYS)
    }

    pub fn search_kingdoms(&self, query: &str, locale: &str, options: &SearchOptions) -> Vec<Record> {
        self.search(self.graph.kingdoms.iter(), query, locale, options, KINGDOM_KEYS)
    }

    pub fn search_classes(&self, query: &str, locale: &str, options: &SearchOptions) -> Vec<Record> {
        self.search(self.graph.classes.iter(), query, locale, options, CLASS_KEYS)
    }

    pub fn search_pets(&self, query: &str, locale: &str, options: &SearchOptions) -> Vec<Record> {
        self.search(self.graph.pets.iter(), query, locale, options, PET_KEYS)
    }

    pub fn search_traits(&self, query: &str, locale: &str, options: &SearchOptions) -> Vec<Record> {
        self.search(self.graph.traits.iter(), query, locale, options, TRAIT_KEYS)
    }

    pub fn search_talent_trees(&self, query: &str, locale: &str, options: &SearchOptions) -> Vec<Record> {
        self.search(self.graph.talent_trees.iter(), query, locale, options, TALENT_TREE_KEYS)
    }
}

fn matches_any(record: &Record, tag: &str, name_only: bool, lookup_keys: &[&str]) -> bool {
    if search_tag(record.name()).contains(tag) {
        return true;
    }
    if name_only {
        return false;
    }
    lookup_keys.iter().any(|key| {
        record
            .path(key)
            .into_iter()
            .flat_map(Value::strings)
            .any(|text| search_tag(text).contains(tag))
    })
}
