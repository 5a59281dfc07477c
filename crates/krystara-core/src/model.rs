//! The cross-referenced entity graph

use crate::derived::{
    AdventureTask, CampaignTask, DropChances, Event, EventKingdomWeek, SoulforgeRecipe, Spoiler,
    Traitstone,
};
use crate::entities::{
    Banner, HeroClass, Kingdom, Pet, Spell, TalentTree, Trait, Troop, Weapon,
};
use crate::{DefId, EntityId, Table};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Troop> = LazyLock::new(Troop::placeholder);

/// Every table the index serves, plus the derived collections
///
/// Built once per data refresh and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityGraph {
    pub spells: Table<EntityId, Spell>,
    pub traits: Table<DefId, Trait>,
    pub troops: Table<EntityId, Troop>,
    pub kingdoms: Table<EntityId, Kingdom>,
    pub banners: Table<EntityId, Banner>,
    pub weapons: Table<EntityId, Weapon>,
    pub pets: Table<EntityId, Pet>,
    pub talent_trees: Table<DefId, TalentTree>,
    pub classes: Table<EntityId, HeroClass>,
    pub traitstones: Table<EntityId, Traitstone>,
    /// Releases sorted by date
    pub spoilers: Vec<Spoiler>,
    /// Events sorted by start
    pub events: Vec<Event>,
    pub campaign_tasks: Vec<CampaignTask>,
    pub soulforge: Vec<SoulforgeRecipe>,
    pub adventure_board: Vec<AdventureTask>,
    pub drop_chances: DropChances,
    pub event_kingdoms: Vec<EventKingdomWeek>,
}

impl EntityGraph {
    /// Create an empty graph holding only the placeholder troop
    pub fn new() -> Self {
        let mut troops = Table::new();
        troops.insert(EntityId::PLACEHOLDER, Troop::placeholder());
        Self {
            spells: Table::new(),
            traits: Table::new(),
            troops,
            kingdoms: Table::new(),
            banners: Table::new(),
            weapons: Table::new(),
            pets: Table::new(),
            talent_trees: Table::new(),
            classes: Table::new(),
            traitstones: Table::new(),
            spoilers: Vec::new(),
            events: Vec::new(),
            campaign_tasks: Vec::new(),
            soulforge: Vec::new(),
            adventure_board: Vec::new(),
            drop_chances: DropChances::new(),
            event_kingdoms: Vec::new(),
        }
    }

    /// The sentinel troop standing in for unresolved team slots
    pub fn placeholder_troop(&self) -> &Troop {
        self.troops
            .get(&EntityId::PLACEHOLDER)
            .unwrap_or(&PLACEHOLDER)
    }

    /// Look up a troop by a team-code id, never returning the placeholder
    pub fn troop(&self, id: EntityId) -> Option<&Troop> {
        self.troops.get(&id).filter(|t| !t.is_placeholder())
    }

    pub fn kingdom(&self, id: EntityId) -> Option<&Kingdom> {
        self.kingdoms.get(&id)
    }

    pub fn spell(&self, id: EntityId) -> Option<&Spell> {
        self.spells.get(&id)
    }

    /// Campaign tasks of one kingdom in dump order
    pub fn campaign_tasks_for(&self, kingdom_id: EntityId) -> impl Iterator<Item = &CampaignTask> {
        self.campaign_tasks
            .iter()
            .filter(move |task| task.kingdom_id == kingdom_id)
    }
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self::new()
    }
}
