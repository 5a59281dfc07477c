//! Derived collections: events, campaign, soulforge and the economy tables

use super::{optional, GraphBuilder};
use crate::error::Result;
use crate::schema::user::RawEvent;
use krystara_core::derived::reward_key;
use krystara_core::time::{from_unix, week};
use krystara_core::{
    AdventureTask, CampaignTask, ColorSet, DropChances, EntityId, Event, EventKind,
    EventKingdomWeek, EventWindow, Rarity, Reward, SoulforgeRecipe, TaskLevel, Traitstone,
};

/// Weapons that can never be crafted during a weekly kingdom event
pub const NON_CRAFTABLE_WEAPON_IDS: &[u32] = &[1099, 1100, 1101, 1102, 1103];

impl GraphBuilder<'_> {
    pub(super) fn derive_collections(&mut self) -> Result<usize> {
        self.derive_events()?;
        self.derive_campaign_tasks();
        self.derive_soulforge();
        self.derive_traitstones();
        self.derive_economy()?;
        Ok(self.graph.events.len())
    }

    fn derive_events(&mut self) -> Result<()> {
        let economy = self.economy()?;
        let mut events = Vec::new();

        for raw in optional(&economy.events, "Events") {
            if let Some(event) = self.event_from_raw(raw) {
                events.push(event);
            }
        }

        for troop in self.graph.troops.iter() {
            let (Some(date), Some(kingdom_id)) = (troop.release_date, troop.kingdom_id) else {
                continue;
            };
            let real = self.graph.kingdom(kingdom_id).is_some_and(|k| k.is_real());
            if troop.rarity == Rarity::Mythic && real {
                events.push(Event {
                    kind: EventKind::MythicPromotion,
                    window: EventWindow::week_from(date),
                    kingdom_id: Some(kingdom_id),
                    troop_id: Some(troop.id),
                    weapon_candidates: Vec::new(),
                });
            }
        }

        events.sort_by_key(|event| event.window.start);
        self.graph.events = events;
        Ok(())
    }

    fn event_from_raw(&self, raw: &RawEvent) -> Option<Event> {
        let (Some(start), Some(end)) = (from_unix(raw.start_date), from_unix(raw.end_date)) else {
            tracing::warn!(kind = %raw.kind, "event dates out of range, skipping");
            return None;
        };
        let window = EventWindow::new(start, end);
        let kind = EventKind::parse(&raw.kind);

        let kingdom_id = raw.kingdom_id.map(EntityId).filter(|id| {
            let known = self.graph.kingdoms.contains(id);
            if !known {
                tracing::warn!(kind = %raw.kind, kingdom = %id, "event names unknown kingdom");
            }
            known
        });
        let troop_id = raw.troop_id.map(EntityId).filter(|id| {
            let known = self.graph.troop(*id).is_some();
            if !known {
                tracing::debug!(kind = %raw.kind, troop = %id, "event names unknown troop");
            }
            known
        });

        let weapon_candidates = match kingdom_id {
            Some(kingdom_id) if kind == EventKind::Kingdom && window.is_weekly() => {
                self.weapon_candidates(kingdom_id, &window)
            }
            _ => Vec::new(),
        };

        Some(Event {
            kind,
            window,
            kingdom_id,
            troop_id,
            weapon_candidates,
        })
    }

    /// Weapons of the kingdom craftable while the event runs
    fn weapon_candidates(&self, kingdom_id: EntityId, window: &EventWindow) -> Vec<EntityId> {
        let Some(kingdom) = self.graph.kingdom(kingdom_id) else {
            return Vec::new();
        };
        kingdom
            .weapon_ids
            .iter()
            .filter(|id| !NON_CRAFTABLE_WEAPON_IDS.contains(&id.raw()))
            .filter(|id| {
                self.graph
                    .weapons
                    .get(id)
                    .is_some_and(|w| w.release_date.map_or(true, |date| date <= window.end))
            })
            .copied()
            .collect()
    }

    fn derive_campaign_tasks(&mut self) {
        let raw_data = self.raw;
        let mut tasks = Vec::new();
        for raw in optional(&raw_data.world.campaign_tasks, "CampaignTasks") {
            let kingdom_id = EntityId(raw.kingdom_id);
            if !self.graph.kingdoms.contains(&kingdom_id) {
                tracing::warn!(task = raw.id, kingdom = %kingdom_id, "campaign task for unknown kingdom");
                continue;
            }
            let Some(level) = TaskLevel::parse(&raw.level) else {
                tracing::warn!(task = raw.id, level = %raw.level, "unknown campaign level");
                continue;
            };
            tasks.push(CampaignTask {
                id: EntityId(raw.id),
                kingdom_id,
                level,
                name: raw.name.clone(),
                description: raw.description.clone(),
                value: raw.value,
            });
        }
        self.graph.campaign_tasks = tasks;
    }

    fn derive_soulforge(&mut self) {
        let raw_data = self.raw;
        self.graph.soulforge = optional(&raw_data.world.soulforge_recipes, "SoulforgeRecipes")
            .iter()
            .map(|raw| {
                let target_id = EntityId(raw.target_id);
                if self.graph.troop(target_id).is_none() && !self.graph.weapons.contains(&target_id) {
                    tracing::debug!(recipe = raw.id, target = %target_id, "soulforge target not indexed");
                }
                SoulforgeRecipe {
                    id: EntityId(raw.id),
                    target_id,
                    category: raw.category.clone(),
                    costs: raw.costs.clone(),
                }
            })
            .collect();
    }

    fn derive_traitstones(&mut self) {
        let raw_data = self.raw;
        for raw in optional(&raw_data.world.traitstones, "Traitstones") {
            let id = EntityId(raw.id);
            let mut troop_ids = Vec::new();
            let mut total_amount = 0;
            for troop in self.graph.troops.iter() {
                let used: u32 = troop
                    .traitstones
                    .iter()
                    .filter(|cost| cost.traitstone_id == id)
                    .map(|cost| cost.amount)
                    .sum();
                if used > 0 {
                    troop_ids.push(troop.id);
                    total_amount += used;
                }
            }
            let stone = Traitstone {
                id,
                name: raw.name.clone(),
                colors: ColorSet::from_flags(raw.mana_colors.iter().map(|(k, on)| (k.as_str(), *on))),
                troop_ids,
                total_amount,
            };
            self.graph.traitstones.insert(id, stone);
        }
    }

    fn derive_economy(&mut self) -> Result<()> {
        let economy = self.economy()?;

        self.graph.adventure_board = optional(&economy.adventure_board, "AdventureBoard")
            .iter()
            .map(|raw| AdventureTask {
                name: raw.name.clone(),
                rarity: Rarity::parse(&raw.rarity),
                raw_rarity: raw.rarity.clone(),
                rewards: raw
                    .rewards
                    .iter()
                    .map(|(raw_type, amount)| Reward {
                        raw_type: raw_type.clone(),
                        key: reward_key(raw_type),
                        amount: *amount,
                    })
                    .collect(),
            })
            .collect();

        let mut chances = DropChances::new();
        if let Some(chests) = &economy.drop_chances {
            for (chest, rarities) in chests {
                let row = rarities
                    .iter()
                    .map(|(raw, percent)| (Rarity::parse(raw), *percent))
                    .collect();
                chances.insert(chest.clone(), row);
            }
        }
        self.graph.drop_chances = chances;

        self.graph.event_kingdoms = match &economy.event_kingdoms {
            Some(rotation) => match from_unix(rotation.start_date) {
                Some(start) => rotation
                    .kingdom_ids
                    .iter()
                    .enumerate()
                    .map(|(week_index, &kingdom_id)| EventKingdomWeek {
                        window: EventWindow::week_from(start + week() * week_index as i32),
                        kingdom_id: EntityId(kingdom_id),
                    })
                    .collect(),
                None => {
                    tracing::warn!(start = rotation.start_date, "event kingdom rotation start out of range");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(())
    }
}
