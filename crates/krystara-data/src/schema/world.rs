//! Game-data dump schema (`World.json`)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top level of the game-data dump
///
/// Required arrays are `Option` so a missing one is reported by name
/// instead of as an opaque parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorldDump {
    pub spells: Option<Vec<RawSpell>>,
    pub traits: Option<Vec<RawTrait>>,
    pub troops: Option<Vec<RawTroop>>,
    pub kingdoms: Option<Vec<RawKingdom>>,
    pub weapons: Option<Vec<RawWeapon>>,
    pub pets: Option<Vec<RawPet>>,
    pub talent_trees: Option<Vec<RawTalentTree>>,
    pub hero_classes: Option<Vec<RawHeroClass>>,
    /// Optional arrays
    #[serde(default)]
    pub campaign_tasks: Option<Vec<RawCampaignTask>>,
    #[serde(default)]
    pub soulforge_recipes: Option<Vec<RawSoulforgeRecipe>>,
    #[serde(default)]
    pub traitstones: Option<Vec<RawTraitstone>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSpellStep {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub spell_power_multiplier: Option<f64>,
    #[serde(default)]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSpell {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub spell_steps: Vec<RawSpellStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTrait {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTraitstoneCost {
    pub id: u32,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTroop {
    pub id: u32,
    pub name: String,
    pub reference_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mana_colors: IndexMap<String, bool>,
    pub troop_rarity: String,
    #[serde(default)]
    pub troop_types: Vec<String>,
    #[serde(default)]
    pub troop_roles: Vec<String>,
    pub spell_id: u32,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub trait_stones: Vec<RawTraitstoneCost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawLevelStat {
    pub stat: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawKingdom {
    pub id: u32,
    pub name: String,
    pub reference_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mana_colors: IndexMap<String, bool>,
    /// 0 for the surface map, 1 for the underworld
    #[serde(default)]
    pub map_index: u8,
    #[serde(default)]
    pub kingdom_type: Option<String>,
    #[serde(default)]
    pub troops: Vec<u32>,
    #[serde(default)]
    pub linked_kingdom_id: Option<u32>,
    #[serde(default)]
    pub banner_name: Option<String>,
    #[serde(default)]
    pub banner_description: String,
    #[serde(default)]
    pub banner_colors: IndexMap<String, i32>,
    #[serde(default)]
    pub file_base: String,
    #[serde(default)]
    pub level_data: Vec<RawLevelStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawWeapon {
    pub id: u32,
    pub reference_name: String,
    pub spell_id: u32,
    #[serde(default)]
    pub mana_colors: IndexMap<String, bool>,
    pub weapon_rarity: String,
    #[serde(default)]
    pub weapon_roles: Vec<String>,
    #[serde(default)]
    pub affixes: Vec<u32>,
    pub kingdom_id: u32,
    #[serde(default)]
    pub mastery_requirement: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPet {
    pub id: u32,
    pub name: String,
    pub reference_name: String,
    #[serde(default)]
    pub mana_colors: IndexMap<String, bool>,
    pub effect: String,
    #[serde(default)]
    pub effect_data: Option<String>,
    pub kingdom_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTalent {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTalentTree {
    pub code: String,
    pub talents: Vec<RawTalent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawHeroClass {
    pub id: u32,
    pub name: String,
    pub reference_name: String,
    #[serde(rename = "Type", default)]
    pub class_type: String,
    pub kingdom_id: u32,
    pub weapon_id: u32,
    pub talent_trees: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCampaignTask {
    pub id: u32,
    pub kingdom_id: u32,
    pub level: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSoulforgeRecipe {
    pub id: u32,
    pub target_id: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub costs: IndexMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTraitstone {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub mana_colors: IndexMap<String, bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_troop() {
        let content = r#"{
            "Id": 6000,
            "Name": "[TROOP_6000_NAME]",
            "ReferenceName": "Goblin",
            "TroopRarity": "Common",
            "SpellId": 2001
        }"#;
        let troop: RawTroop = serde_json::from_str(content).unwrap();
        assert_eq!(troop.id, 6000);
        assert!(troop.mana_colors.is_empty());
        assert!(troop.traits.is_empty());
    }

    #[test]
    fn test_missing_arrays_are_none() {
        let dump: WorldDump = serde_json::from_str(r#"{"Spells": []}"#).unwrap();
        assert!(dump.spells.is_some());
        assert!(dump.troops.is_none());
        assert!(dump.campaign_tasks.is_none());
    }
}
