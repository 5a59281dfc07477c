//! Typed entity records
//!
//! Cross references are plain ids into the owning [`EntityGraph`](crate::EntityGraph)
//! tables. Fields that only some dumps provide are `Option`s.

use crate::{ColorSet, DefId, EntityId, Rarity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name of the placeholder troop
pub const UNKNOWN_NAME: &str = "`?`";

/// One `(multiplier, amount)` step of a spell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpellEffect {
    pub multiplier: f64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub effects: Vec<SpellEffect>,
    pub boost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub code: DefId,
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Traitstones needed to unlock one trait slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitstoneCost {
    pub traitstone_id: EntityId,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Troop {
    pub id: EntityId,
    pub name: String,
    pub reference_name: String,
    pub description: String,
    pub colors: ColorSet,
    pub rarity: Rarity,
    pub raw_rarity: String,
    pub types: Vec<String>,
    pub roles: Vec<String>,
    pub spell_id: EntityId,
    pub traits: Vec<DefId>,
    pub traitstones: Vec<TraitstoneCost>,
    pub kingdom_id: Option<EntityId>,
    pub release_date: Option<DateTime<Utc>>,
}

impl Troop {
    /// The sentinel troop used for unresolvable team slots
    pub fn placeholder() -> Self {
        Self {
            id: EntityId::PLACEHOLDER,
            name: UNKNOWN_NAME.to_string(),
            reference_name: UNKNOWN_NAME.to_string(),
            description: String::new(),
            colors: ColorSet::default(),
            rarity: Rarity::Common,
            raw_rarity: Rarity::Common.as_str().to_string(),
            types: Vec::new(),
            roles: Vec::new(),
            spell_id: EntityId(0),
            traits: Vec::new(),
            traitstones: Vec::new(),
            kingdom_id: None,
            release_date: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == EntityId::PLACEHOLDER
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: EntityId,
    /// Taken from the weapon's spell
    pub name: String,
    /// Taken from the weapon's spell
    pub description: String,
    pub reference_name: String,
    pub colors: ColorSet,
    pub rarity: Rarity,
    pub raw_rarity: String,
    pub roles: Vec<String>,
    pub spell_id: EntityId,
    pub affixes: Vec<EntityId>,
    pub kingdom_id: EntityId,
    pub mastery_requirement: u32,
    pub release_date: Option<DateTime<Utc>>,
}

impl Weapon {
    /// Mastery requirement of weapons anyone can obtain at any time
    pub const ALWAYS_AVAILABLE: u32 = 0;

    pub fn is_always_available(&self) -> bool {
        self.mastery_requirement == Self::ALWAYS_AVAILABLE
    }
}

/// Which map a kingdom sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KingdomLocation {
    Krystara,
    Underworld,
    Warband,
}

impl KingdomLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            KingdomLocation::Krystara => "krystara",
            KingdomLocation::Underworld => "underworld",
            KingdomLocation::Warband => "warband",
        }
    }
}

impl fmt::Display for KingdomLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kingdom {
    pub id: EntityId,
    pub name: String,
    pub reference_name: String,
    pub description: String,
    pub colors: ColorSet,
    pub location: KingdomLocation,
    pub troop_ids: Vec<EntityId>,
    pub weapon_ids: Vec<EntityId>,
    pub linked_kingdom_id: Option<EntityId>,
    /// `(stat, amount)` bonuses granted while levelling the kingdom
    pub level_stats: Vec<(String, i64)>,
    pub release_date: Option<DateTime<Utc>>,
    // Filled in by later passes
    pub class_id: Option<EntityId>,
    pub event_weapon_id: Option<EntityId>,
    pub pet_id: Option<EntityId>,
    pub primary_color: Option<String>,
    pub primary_stat: Option<String>,
}

impl Kingdom {
    /// Warbands are not places, so they never host events
    pub fn is_real(&self) -> bool {
        self.location != KingdomLocation::Warband
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    /// Same as the owning kingdom's id
    pub id: EntityId,
    pub name: String,
    pub description: String,
    /// `(color, magnitude)` pairs, strongest first
    pub colors: Vec<(String, i32)>,
    pub filename: String,
}

impl Banner {
    /// The banner shown for a team code whose banner slot is unknown
    pub fn locked() -> Self {
        Self {
            id: EntityId::PLACEHOLDER,
            name: UNKNOWN_NAME.to_string(),
            description: String::new(),
            colors: Vec::new(),
            filename: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub code: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentTree {
    pub code: DefId,
    pub talents: Vec<Talent>,
    pub class_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroClass {
    pub id: EntityId,
    pub name: String,
    pub reference_name: String,
    pub class_type: String,
    pub kingdom_id: EntityId,
    pub weapon_id: EntityId,
    pub talent_trees: Vec<DefId>,
    pub traits: Vec<DefId>,
    pub release_date: Option<DateTime<Utc>>,
}

/// What a pet's bonus applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetEffect {
    Color,
    Troop,
    TroopType,
    Kingdom,
    Faction,
    Other(String),
}

impl PetEffect {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Color" | "ColorBonus" => PetEffect::Color,
            "Troop" | "TroopBonus" => PetEffect::Troop,
            "TroopType" | "TroopTypeBonus" => PetEffect::TroopType,
            "Kingdom" | "KingdomBonus" => PetEffect::Kingdom,
            "Faction" | "FactionBonus" => PetEffect::Faction,
            other => PetEffect::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PetEffect::Color => "color",
            PetEffect::Troop => "troop",
            PetEffect::TroopType => "troop_type",
            PetEffect::Kingdom => "kingdom",
            PetEffect::Faction => "faction",
            PetEffect::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: EntityId,
    pub name: String,
    pub reference_name: String,
    pub colors: ColorSet,
    pub effect: PetEffect,
    pub effect_data: Option<String>,
    pub kingdom_id: EntityId,
    pub release_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_troop() {
        let troop = Troop::placeholder();
        assert!(troop.is_placeholder());
        assert_eq!(troop.name, UNKNOWN_NAME);
    }

    #[test]
    fn test_pet_effect_parse() {
        assert_eq!(PetEffect::parse("ColorBonus"), PetEffect::Color);
        assert_eq!(PetEffect::parse("Faction"), PetEffect::Faction);
        assert_eq!(
            PetEffect::parse("Gnome"),
            PetEffect::Other("Gnome".to_string())
        );
        assert_eq!(PetEffect::TroopType.as_str(), "troop_type");
    }
}
