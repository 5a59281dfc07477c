//! User/economy dump schema (`User.json`)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDump {
    #[serde(rename = "pEconomyModel")]
    pub economy: Option<EconomyModel>,
}

/// Everything in the economy model is optional; absent arrays build as empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EconomyModel {
    pub troop_release_dates: Option<Vec<RawReleaseDate>>,
    pub kingdom_release_dates: Option<Vec<RawReleaseDate>>,
    pub hero_class_release_dates: Option<Vec<RawReleaseDate>>,
    pub pet_release_dates: Option<Vec<RawReleaseDate>>,
    pub weapon_release_dates: Option<Vec<RawReleaseDate>>,
    pub room_release_dates: Option<Vec<RawReleaseDate>>,
    pub events: Option<Vec<RawEvent>>,
    pub event_kingdoms: Option<RawEventKingdoms>,
    pub adventure_board: Option<Vec<RawAdventureTask>>,
    /// Chest name to raw rarity to percent
    pub drop_chances: Option<IndexMap<String, IndexMap<String, f64>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawReleaseDate {
    pub id: u32,
    /// Unix seconds
    pub date: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawEvent {
    #[serde(rename = "Type")]
    pub kind: String,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default)]
    pub kingdom_id: Option<u32>,
    #[serde(default)]
    pub troop_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawEventKingdoms {
    pub start_date: i64,
    pub kingdom_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAdventureTask {
    pub name: String,
    pub rarity: String,
    #[serde(default)]
    pub rewards: IndexMap<String, i64>,
}
