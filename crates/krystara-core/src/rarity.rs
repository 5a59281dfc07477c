//! Rarity tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rarity tier, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    UltraRare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    /// All tiers in order
    pub const TIERS: [Rarity; 7] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::UltraRare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    /// Tier used for rarity strings the index does not know yet
    pub const FALLBACK: Rarity = Self::TIERS[1];

    /// Map a raw rarity string to a tier.
    ///
    /// Unknown strings land on [`Rarity::FALLBACK`] so newer dumps still build.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match Self::TIERS
            .iter()
            .find(|tier| tier.as_str().to_ascii_lowercase() == normalized)
        {
            Some(tier) => *tier,
            None => {
                tracing::warn!(rarity = raw, "unknown rarity, using {}", Self::FALLBACK);
                Self::FALLBACK
            }
        }
    }

    /// Position in [`Rarity::TIERS`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::UltraRare => "UltraRare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }

    /// Translation key for the tier's display name
    pub fn translation_key(&self) -> String {
        format!("[RARITY_{}]", self.index())
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known() {
        assert_eq!(Rarity::parse("Epic"), Rarity::Epic);
        assert_eq!(Rarity::parse("UltraRare"), Rarity::UltraRare);
        assert_eq!(Rarity::parse("Ultra-Rare"), Rarity::UltraRare);
        assert_eq!(Rarity::parse("mythic"), Rarity::Mythic);
    }

    #[test]
    fn test_unknown_defaults_to_second_tier() {
        assert_eq!(Rarity::parse("Transcendent"), Rarity::Uncommon);
        assert_eq!(Rarity::parse(""), Rarity::Uncommon);
    }

    #[test]
    fn test_index_and_key() {
        assert_eq!(Rarity::Common.index(), 0);
        assert_eq!(Rarity::Mythic.index(), 6);
        assert_eq!(Rarity::Epic.translation_key(), "[RARITY_4]");
        assert!(Rarity::Legendary > Rarity::Epic);
    }
}
