//! Locale tables and record translation

use crate::error::{Error, Result};
use crate::fallback::FallbackChain;
use crate::locale::{LocaleNormalizer, StandardLocales};
use indexmap::IndexMap;
use krystara_core::{EntityGraph, Indexed, Record, Value, ValueMap};
use std::fs;
use std::path::Path;

/// Locale every other locale falls back to
pub const BASE_LOCALE: &str = "en";

/// Separates the singular and plural forms of one translation
pub const PLURAL_SEPARATOR: char = '\u{1f}';

/// A string is untranslated iff it is still a bracketed key
pub fn is_untranslated(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('[') && text.ends_with(']')
}

/// Pick one form of a `singular\u{1f}plural` translation
pub fn select_plural(text: &str, plural: bool) -> &str {
    match text.split_once(PLURAL_SEPARATOR) {
        Some((one, many)) => {
            if plural {
                many
            } else {
                one
            }
        }
        None => text,
    }
}

type Table = IndexMap<String, String>;

/// Translation tables for every loaded locale
pub struct Translator {
    base: String,
    tables: IndexMap<String, Table>,
    normalizer: Box<dyn LocaleNormalizer>,
}

impl Translator {
    /// Create an empty translator with `base` as the fallback locale
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            tables: IndexMap::new(),
            normalizer: Box::new(StandardLocales::new()),
        }
    }

    /// Replace the locale normalizer
    pub fn with_normalizer(mut self, normalizer: impl LocaleNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Add or replace the table for a locale
    pub fn insert_table(&mut self, locale: impl Into<String>, table: IndexMap<String, String>) {
        self.tables.insert(locale.into(), table);
    }

    /// Load a locale's table from a JSON object of strings
    pub fn load_str(&mut self, locale: &str, content: &str) -> Result<()> {
        let table: Table = serde_json::from_str(content).map_err(|source| Error::InvalidTable {
            locale: locale.to_string(),
            source,
        })?;
        tracing::debug!(locale, keys = table.len(), "loaded translation table");
        self.tables.insert(locale.to_string(), table);
        Ok(())
    }

    /// Load every `<locale>.json` in a directory
    ///
    /// File stems are normalized, so `de_DE.json` loads as `de`. Fails if
    /// the directory holds no table for `base`.
    pub fn load_dir(path: impl AsRef<Path>, base: &str) -> Result<Self> {
        let mut translator = Self::new(base);
        let mut files: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for file in files {
            let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let locale = match translator.normalizer.normalize(stem) {
                Some(code) => code,
                None => {
                    tracing::warn!(file = %file.display(), "unrecognized locale file name, loading as-is");
                    stem.to_lowercase()
                }
            };
            let content = fs::read_to_string(&file)?;
            translator.load_str(&locale, &content)?;
        }

        if !translator.tables.contains_key(base) {
            return Err(Error::MissingBase(base.to_string()));
        }
        tracing::info!(locales = translator.tables.len(), "translation tables loaded");
        Ok(translator)
    }

    pub fn base_locale(&self) -> &str {
        &self.base
    }

    /// Loaded locale codes in load order
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(locale)
    }

    /// Drop every table except the base locale and `keep`
    ///
    /// Entries in `keep` are normalized first; unknown ones are ignored.
    pub fn retain_locales<S: AsRef<str>>(&mut self, keep: &[S]) {
        let wanted: Vec<String> = keep
            .iter()
            .filter_map(|locale| self.normalizer.normalize(locale.as_ref()))
            .collect();
        let base = &self.base;
        self.tables
            .retain(|locale, _| locale == base || wanted.contains(locale));
    }

    /// The loaded locale a request maps to, falling back to the base locale
    pub fn resolve_locale(&self, requested: &str) -> &str {
        if let Some(code) = self.normalizer.normalize(requested) {
            if let Some((loaded, _)) = self.tables.get_key_value(&code) {
                return loaded;
            }
        }
        if let Some((loaded, _)) = self.tables.get_key_value(requested) {
            return loaded;
        }
        tracing::warn!(locale = requested, base = %self.base, "unknown locale, using base");
        &self.base
    }

    /// Look up one key exactly in a loaded locale's table
    fn entry(&self, locale: &str, key: &str) -> Option<&str> {
        self.tables.get(locale)?.get(key).map(String::as_str)
    }

    /// Translate a key with an explicit fallback chain
    ///
    /// Tries every chain candidate in `locale`, then in the base locale.
    /// Returns the key itself if nothing matches, so the result may still be
    /// untranslated. Plural forms are returned whole; see [`select_plural`].
    pub fn translate_key_with(&self, key: &str, locale: &str, chain: FallbackChain) -> String {
        if !is_untranslated(key) {
            return key.to_string();
        }
        let candidates = chain.candidates(key);
        let found = [locale, self.base.as_str()].iter().find_map(|loc| {
            candidates
                .iter()
                .find_map(|candidate| self.entry(loc, candidate))
        });
        match found {
            Some(text) => text.to_string(),
            None => {
                tracing::trace!(key, locale, chain = chain.name, "no translation");
                key.to_string()
            }
        }
    }

    /// Translate a key using the default fallback chain
    pub fn translate_key(&self, key: &str, locale: &str) -> String {
        let locale = self.resolve_locale(locale);
        self.translate_key_with(key, locale, FallbackChain::DEFAULT)
    }

    /// Translate every bracketed string inside a value
    ///
    /// `locale` must already be resolved. Map keys that are bracketed are
    /// renamed too, and each nested map whose `name` stays untranslated takes
    /// its `reference_name` (or `code`) instead.
    pub fn translate_value(&self, value: &Value, locale: &str, chain: FallbackChain) -> Value {
        match value {
            Value::String(text) if is_untranslated(text) => {
                let translated = self.translate_key_with(text, locale, chain);
                Value::String(select_plural(&translated, false).to_string())
            }
            Value::List(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.translate_value(item, locale, chain))
                    .collect(),
            ),
            Value::Map(map) => Value::Map(self.translate_map(map, locale)),
            other => other.clone(),
        }
    }

    fn translate_map(&self, map: &ValueMap, locale: &str) -> ValueMap {
        let mut translated = ValueMap::with_capacity(map.len());
        for (key, value) in map {
            let field_chain = FallbackChain::for_field(key);
            let new_key = if is_untranslated(key) {
                let text = self.translate_key_with(key, locale, field_chain);
                select_plural(&text, false).to_string()
            } else {
                key.clone()
            };
            translated.insert(new_key, self.translate_value(value, locale, field_chain));
        }
        substitute_reference_name(&mut translated);
        translated
    }

    /// Translate a rendered record into `locale`
    pub fn translate_record(&self, record: &Record, locale: &str) -> Record {
        let locale = self.resolve_locale(locale);
        Record {
            kind: record.kind,
            fields: self.translate_map(&record.fields, locale),
        }
    }

    /// Render and translate an entity
    pub fn translate<T: Indexed>(&self, entity: &T, graph: &EntityGraph, locale: &str) -> Record {
        self.translate_record(&entity.to_record(graph), locale)
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("base", &self.base)
            .field("locales", &self.tables.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn substitute_reference_name(map: &mut ValueMap) {
    let untranslated = map
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(is_untranslated);
    if !untranslated {
        return;
    }
    let replacement = ["reference_name", "code"]
        .iter()
        .find_map(|field| map.get(*field).and_then(Value::as_str))
        .map(str::to_string);
    if let Some(replacement) = replacement {
        map.insert("name".to_string(), Value::String(replacement));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krystara_core::{EntityId, Namespace};
    use krystara_data::fixtures;
    use std::io::Write;

    fn translator() -> Translator {
        let mut translator = Translator::new(BASE_LOCALE);
        for locale in ["en", "de"] {
            let table = fixtures::translations(locale).unwrap();
            translator.load_str(locale, &table).unwrap();
        }
        translator
    }

    #[test]
    fn test_is_untranslated() {
        assert!(is_untranslated("[TROOP_1_NAME]"));
        assert!(!is_untranslated("Goblin"));
        assert!(!is_untranslated("[open"));
        assert!(!is_untranslated("["));
        assert!(!is_untranslated(""));
    }

    #[test]
    fn test_select_plural() {
        let text = "Gem Key\u{1f}Gem Keys";
        assert_eq!(select_plural(text, false), "Gem Key");
        assert_eq!(select_plural(text, true), "Gem Keys");
        assert_eq!(select_plural("Souls", true), "Souls");
    }

    #[test]
    fn test_translate_key_falls_back_to_base() {
        let translator = translator();
        assert_eq!(translator.translate_key("[TROOP_6000_NAME]", "de"), "Kobold");
        // German has no entry for this troop
        assert_eq!(translator.translate_key("[TROOP_6699_NAME]", "de"), "Éclair");
        assert_eq!(translator.translate_key("[NOPE]", "de"), "[NOPE]");
        assert_eq!(translator.translate_key("plain", "de"), "plain");
    }

    #[test]
    fn test_retain_locales_keeps_base() {
        let mut translator = translator();
        translator.retain_locales(&["fr"]);
        assert_eq!(translator.locales().collect::<Vec<_>>(), vec!["en"]);

        let mut translator = self::translator();
        translator.retain_locales(&["German"]);
        assert!(translator.has_locale("de"));
    }

    #[test]
    fn test_unknown_locale_uses_base() {
        let translator = translator();
        assert_eq!(translator.resolve_locale("klingon"), "en");
        assert_eq!(translator.resolve_locale("German"), "de");
        assert_eq!(translator.translate_key("[TROOP_6000_NAME]", "fr"), "Goblin");
    }

    #[test]
    fn test_translate_entity() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let troop = graph.troop(EntityId(6251)).unwrap();
        let record = translator.translate(troop, &graph, "en");

        assert_eq!(record.kind, Namespace::Troop);
        assert_eq!(record.name(), "Bone Dragon");
        assert_eq!(record.get_str("rarity"), Some("Legendary"));
        assert_eq!(record.get_str("raw_rarity"), Some("Legendary"));
        let types: Vec<&str> = record.path("types").into_iter().flat_map(Value::strings).collect();
        // Undead only resolves through the prefix-stripping fallback
        assert_eq!(types, ["Dragon", "Undead"]);
        assert_eq!(record.path("kingdom.name")[0].as_str(), Some("Broken Spire"));
        assert_eq!(record.path("spell.name")[0].as_str(), Some("Bone Breath"));
    }

    #[test]
    fn test_every_entity_gets_a_name() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        for locale in ["en", "de"] {
            for troop in graph.troops.iter() {
                let record = translator.translate(troop, &graph, locale);
                assert!(!is_untranslated(record.name()), "{}", record.name());
            }
            for kingdom in graph.kingdoms.iter() {
                assert!(!is_untranslated(translator.translate(kingdom, &graph, locale).name()));
            }
            for tree in graph.talent_trees.iter() {
                assert!(!is_untranslated(translator.translate(tree, &graph, locale).name()));
            }
            for t in graph.traits.iter() {
                assert!(!is_untranslated(translator.translate(t, &graph, locale).name()));
            }
        }
    }

    #[test]
    fn test_untranslated_name_uses_reference_name() {
        let graph = fixtures::graph().unwrap();
        let translator = Translator::new(BASE_LOCALE);
        let troop = graph.troop(EntityId(6000)).unwrap();
        let record = translator.translate(troop, &graph, "en");
        assert_eq!(record.name(), "Goblin");
        assert_eq!(record.path("kingdom.name")[0].as_str(), Some("Broken Spire"));
    }

    #[test]
    fn test_translation_is_idempotent() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let kingdom = graph.kingdom(EntityId(3000)).unwrap();
        let once = translator.translate(kingdom, &graph, "de");
        let twice = translator.translate_record(&once, "de");
        assert_eq!(once, twice);
        assert_eq!(once.name(), "Zerbrochene Spitze");

        let troop = graph.troop(EntityId(6000)).unwrap();
        let once = translator.translate(troop, &graph, "de");
        let twice = translator.translate_record(&once, "de");
        assert_eq!(once, twice);
        let raw_types: Vec<&str> = twice.path("raw_types").into_iter().flat_map(Value::strings).collect();
        let types: Vec<&str> = twice.path("types").into_iter().flat_map(Value::strings).collect();
        assert_eq!(raw_types, ["Goblin"]);
        assert_eq!(types, ["Kobold"]);
    }

    #[test]
    fn test_bracketed_map_keys_are_renamed() {
        let translator = translator();
        let mut rewards = ValueMap::new();
        rewards.insert("[GEM_KEYS]".to_string(), Value::Int(5));
        let record = Record::new(Namespace::Troop).with("rewards", Value::Map(rewards));
        let translated = translator.translate_record(&record, "en");
        assert_eq!(translated.path("rewards.Gem Key")[0].as_int(), Some(5));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        for (file, locale) in [("en.json", "en"), ("de_DE.json", "de")] {
            let mut f = fs::File::create(dir.path().join(file)).unwrap();
            f.write_all(fixtures::translations(locale).unwrap().as_bytes())
                .unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let translator = Translator::load_dir(dir.path(), "en").unwrap();
        assert_eq!(translator.locales().collect::<Vec<_>>(), ["de", "en"]);
        assert_eq!(translator.translate_key("[TROOP_6000_NAME]", "de"), "Kobold");
    }

    #[test]
    fn test_load_dir_requires_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("de.json"), "{}").unwrap();
        assert!(matches!(
            Translator::load_dir(dir.path(), "en"),
            Err(Error::MissingBase(_))
        ));
    }

    #[test]
    fn test_invalid_table() {
        let mut translator = Translator::new("en");
        let err = translator.load_str("en", r#"{"[A]": 1}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTable { .. }));
    }
}
