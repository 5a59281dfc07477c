//! Locale codes and their aliases

use indexmap::IndexMap;

/// Maps whatever a caller typed to a canonical locale code
pub trait LocaleNormalizer: Send + Sync {
    /// The canonical code, or `None` if the input names no known language
    fn normalize(&self, raw: &str) -> Option<String>;
}

/// Canonical codes with their native names
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("de", "Deutsch"),
    ("fr", "Français"),
    ("it", "Italiano"),
    ("es", "Español"),
    ("ru", "Русский"),
    ("zh", "中文"),
    ("pl", "Polski"),
];

const ALIASES: &[(&str, &str)] = &[
    ("english", "en"),
    ("german", "de"),
    ("french", "fr"),
    ("italian", "it"),
    ("spanish", "es"),
    ("russian", "ru"),
    ("chinese", "zh"),
    ("cn", "zh"),
    ("polish", "pl"),
];

/// The built-in language list
///
/// Accepts codes (`de`), regional codes (`de-AT`, `de_AT`), English names
/// (`german`), native names (`Deutsch`) and a few legacy codes (`cn`).
#[derive(Debug, Clone)]
pub struct StandardLocales {
    aliases: IndexMap<String, String>,
}

impl StandardLocales {
    pub fn new() -> Self {
        let mut aliases = IndexMap::new();
        for (code, native) in LANGUAGES {
            aliases.insert((*code).to_string(), (*code).to_string());
            aliases.insert(native.to_lowercase(), (*code).to_string());
        }
        for (alias, code) in ALIASES {
            aliases.insert((*alias).to_string(), (*code).to_string());
        }
        Self { aliases }
    }

    /// Register an extra alias
    pub fn with_alias(mut self, alias: &str, code: &str) -> Self {
        self.aliases.insert(alias.to_lowercase(), code.to_string());
        self
    }
}

impl Default for StandardLocales {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleNormalizer for StandardLocales {
    fn normalize(&self, raw: &str) -> Option<String> {
        let lowered = raw.trim().to_lowercase().replace('_', "-");
        if let Some(code) = self.aliases.get(&lowered) {
            return Some(code.clone());
        }
        let (language, _region) = lowered.split_once('-')?;
        self.aliases.get(language).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_codes_and_names() {
        let locales = StandardLocales::new();
        assert_eq!(locales.normalize("de").as_deref(), Some("de"));
        assert_eq!(locales.normalize(" DE ").as_deref(), Some("de"));
        assert_eq!(locales.normalize("Deutsch").as_deref(), Some("de"));
        assert_eq!(locales.normalize("german").as_deref(), Some("de"));
        assert_eq!(locales.normalize("cn").as_deref(), Some("zh"));
    }

    #[test]
    fn test_normalize_regional() {
        let locales = StandardLocales::new();
        assert_eq!(locales.normalize("en_US").as_deref(), Some("en"));
        assert_eq!(locales.normalize("fr-CA").as_deref(), Some("fr"));
    }

    #[test]
    fn test_unknown_locale() {
        let locales = StandardLocales::new();
        assert_eq!(locales.normalize("klingon"), None);
        assert_eq!(locales.normalize("xx-YY"), None);
    }

    #[test]
    fn test_custom_alias() {
        let locales = StandardLocales::new().with_alias("Deutsch-Schweiz", "de");
        assert_eq!(locales.normalize("deutsch-schweiz").as_deref(), Some("de"));
    }
}
