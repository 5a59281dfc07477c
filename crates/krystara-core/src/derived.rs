//! Collections computed from the dumps after the entity tables are built

use crate::{ColorSet, EntityId, EventWindow, Rarity};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of a dated release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpoilerKind {
    Troop,
    Kingdom,
    Class,
    Pet,
    Weapon,
    Room,
}

/// An upcoming or past release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spoiler {
    pub kind: SpoilerKind,
    pub id: EntityId,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Week-long promotion synthesized for a mythic troop release
    MythicPromotion,
    /// Kingdom-scoped weekly event
    Kingdom,
    Raid,
    Invasion,
    Other(String),
}

impl EventKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Kingdom" | "WeeklyEvent" => EventKind::Kingdom,
            "Raid" | "RaidBoss" => EventKind::Raid,
            "Invasion" => EventKind::Invasion,
            other => EventKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub window: EventWindow,
    pub kingdom_id: Option<EntityId>,
    pub troop_id: Option<EntityId>,
    /// Weapons that can be crafted during a weekly kingdom event
    pub weapon_candidates: Vec<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskLevel {
    Bronze,
    Silver,
    Gold,
}

impl TaskLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "bronze" => Some(TaskLevel::Bronze),
            "silver" => Some(TaskLevel::Silver),
            "gold" => Some(TaskLevel::Gold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignTask {
    pub id: EntityId,
    pub kingdom_id: EntityId,
    pub level: TaskLevel,
    pub name: String,
    pub description: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoulforgeRecipe {
    pub id: EntityId,
    pub target_id: EntityId,
    pub category: String,
    /// Resource name to amount, in dump order
    pub costs: IndexMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traitstone {
    pub id: EntityId,
    pub name: String,
    pub colors: ColorSet,
    /// Troops needing this stone, in troop table order
    pub troop_ids: Vec<EntityId>,
    /// Stones needed to fully trait every troop above
    pub total_amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub raw_type: String,
    /// Translation key derived from `raw_type`
    pub key: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdventureTask {
    pub name: String,
    pub rarity: Rarity,
    pub raw_rarity: String,
    pub rewards: Vec<Reward>,
}

/// Chest name to `(rarity, percent)` pairs, rarest last
pub type DropChances = IndexMap<String, Vec<(Rarity, f64)>>;

/// One week of the event-kingdom rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventKingdomWeek {
    pub window: EventWindow,
    pub kingdom_id: EntityId,
}

/// Turn a raw reward type into a translation key: `"GemKeys"` becomes `"[GEM_KEYS]"`.
pub fn reward_key(raw_type: &str) -> String {
    let mut key = String::with_capacity(raw_type.len() + 4);
    key.push('[');
    let mut prev_lower = false;
    for c in raw_type.chars() {
        if c == ' ' || c == '-' || c == '_' {
            if !key.ends_with('_') && key.len() > 1 {
                key.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            key.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        key.extend(c.to_uppercase());
    }
    key.push(']');
    key
}
