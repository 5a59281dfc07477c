//! Elemental color sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sorted set of color names an entity is affine to
///
/// Ordering is lexicographic on the color name so two sets built from the same
/// flags always compare equal, whatever order the dump listed them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSet(Vec<String>);

impl ColorSet {
    /// Build a set from raw `(key, flag)` pairs, keeping keys whose flag is true.
    pub fn from_flags<'a, I>(flags: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut colors: Vec<String> = flags
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(key, _)| color_name(key))
            .collect();
        colors.sort();
        colors.dedup();
        Self(colors)
    }

    /// Build a set from color names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut colors: Vec<String> = names
            .into_iter()
            .map(|n| color_name(n.as_ref()))
            .collect();
        colors.sort();
        colors.dedup();
        Self(colors)
    }

    pub fn contains(&self, color: &str) -> bool {
        self.0.iter().any(|c| c == color)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("-"))
    }
}

/// Normalize a raw color key: `"ColorBlue"` becomes `"blue"`.
pub fn color_name(raw: &str) -> String {
    raw.strip_prefix("Color").unwrap_or(raw).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_sorts_by_name() {
        let set = ColorSet::from_flags([
            ("ColorRed", true),
            ("ColorBlue", true),
            ("ColorGreen", false),
            ("ColorBrown", true),
        ]);
        assert_eq!(set.as_slice(), ["blue", "brown", "red"]);
        assert!(set.contains("red"));
        assert!(!set.contains("green"));
    }

    #[test]
    fn test_order_independent_equality() {
        let a = ColorSet::from_flags([("ColorPurple", true), ("ColorYellow", true)]);
        let b = ColorSet::from_names(["yellow", "purple"]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "purple-yellow");
    }
}
