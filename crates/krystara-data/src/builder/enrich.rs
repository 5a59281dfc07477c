//! Release dates and post-hoc kingdom enrichment

use super::{optional, GraphBuilder};
use crate::error::Result;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use krystara_core::time::from_unix;
use krystara_core::{EntityId, KingdomLocation, PetEffect, Rarity, Spoiler, SpoilerKind};

impl GraphBuilder<'_> {
    pub(super) fn apply_release_dates(&mut self) -> Result<usize> {
        let economy = self.economy()?;
        let sources = [
            (SpoilerKind::Troop, &economy.troop_release_dates, "TroopReleaseDates"),
            (SpoilerKind::Kingdom, &economy.kingdom_release_dates, "KingdomReleaseDates"),
            (SpoilerKind::Class, &economy.hero_class_release_dates, "HeroClassReleaseDates"),
            (SpoilerKind::Pet, &economy.pet_release_dates, "PetReleaseDates"),
            (SpoilerKind::Weapon, &economy.weapon_release_dates, "WeaponReleaseDates"),
            (SpoilerKind::Room, &economy.room_release_dates, "RoomReleaseDates"),
        ];

        let mut spoilers = Vec::new();
        for (kind, dates, field) in sources {
            for entry in optional(dates, field) {
                let id = EntityId(entry.id);
                let Some(date) = from_unix(entry.date) else {
                    tracing::warn!(?kind, %id, date = entry.date, "release date out of range, skipping");
                    continue;
                };
                if !self.set_release_date(kind, id, date) {
                    tracing::warn!(?kind, %id, "release date for unknown entity, skipping");
                    continue;
                }
                spoilers.push(Spoiler { kind, id, date });
            }
        }
        spoilers.sort_by_key(|spoiler| spoiler.date);
        self.graph.spoilers = spoilers;
        Ok(self.graph.spoilers.len())
    }

    /// Record a release date on the entity; false if it does not exist
    fn set_release_date(&mut self, kind: SpoilerKind, id: EntityId, date: DateTime<Utc>) -> bool {
        let slot = match kind {
            SpoilerKind::Troop => self
                .graph
                .troops
                .get_mut(&id)
                .filter(|t| !t.is_placeholder())
                .map(|t| &mut t.release_date),
            SpoilerKind::Kingdom => self.graph.kingdoms.get_mut(&id).map(|k| &mut k.release_date),
            SpoilerKind::Class => self.graph.classes.get_mut(&id).map(|c| &mut c.release_date),
            SpoilerKind::Pet => self.graph.pets.get_mut(&id).map(|p| &mut p.release_date),
            SpoilerKind::Weapon => self.graph.weapons.get_mut(&id).map(|w| &mut w.release_date),
            // Rooms have no table of their own
            SpoilerKind::Room => return true,
        };
        match slot {
            Some(slot) => {
                *slot = Some(date);
                true
            }
            None => false,
        }
    }

    pub(super) fn enrich_kingdoms(&mut self) -> Result<usize> {
        let ids: Vec<EntityId> = self.graph.kingdoms.keys().copied().collect();
        for id in &ids {
            let primary_color = self.primary_color(*id);
            let pet_id = self.kingdom_pet(*id);
            if let Some(kingdom) = self.graph.kingdoms.get_mut(id) {
                kingdom.primary_color = primary_color;
                kingdom.primary_stat = primary_stat(&kingdom.level_stats);
                kingdom.pet_id = pet_id;
            }
        }

        let mut faction_weapons = 0;
        for id in &ids {
            if let Some(weapon_id) = self.faction_weapon(*id) {
                if let Some(kingdom) = self.graph.kingdoms.get_mut(id) {
                    kingdom.event_weapon_id = Some(weapon_id);
                    faction_weapons += 1;
                }
            }
        }
        tracing::debug!(faction_weapons, "inferred faction event weapons");
        Ok(ids.len())
    }

    /// Strongest positive banner color, else the kingdom's first color
    fn primary_color(&self, id: EntityId) -> Option<String> {
        let from_banner = self.graph.banners.get(&id).and_then(|banner| {
            banner
                .colors
                .iter()
                .find(|(_, magnitude)| *magnitude > 0)
                .map(|(color, _)| color.clone())
        });
        from_banner.or_else(|| {
            self.graph
                .kingdoms
                .get(&id)
                .and_then(|k| k.colors.iter().next().map(str::to_string))
        })
    }

    /// Underworld kingdoms prefer a faction pet, others a kingdom pet
    fn kingdom_pet(&self, id: EntityId) -> Option<EntityId> {
        let kingdom = self.graph.kingdoms.get(&id)?;
        let preferred = match kingdom.location {
            KingdomLocation::Underworld => PetEffect::Faction,
            _ => PetEffect::Kingdom,
        };
        let mut pets = self.graph.pets.iter().filter(|pet| pet.kingdom_id == id);
        let first = pets.next()?;
        if first.effect == preferred {
            return Some(first.id);
        }
        Some(
            pets.find(|pet| pet.effect == preferred)
                .map_or(first.id, |pet| pet.id),
        )
    }

    /// Last Epic, always-available weapon of the linked surface kingdom
    /// whose colors equal the underworld kingdom's colors
    fn faction_weapon(&self, id: EntityId) -> Option<EntityId> {
        let faction = self.graph.kingdoms.get(&id)?;
        if faction.location != KingdomLocation::Underworld {
            return None;
        }
        let surface = self.graph.kingdoms.get(&faction.linked_kingdom_id?)?;
        if surface.location != KingdomLocation::Krystara {
            return None;
        }
        surface
            .weapon_ids
            .iter()
            .rev()
            .filter_map(|weapon_id| self.graph.weapons.get(weapon_id))
            .find(|weapon| {
                weapon.rarity == Rarity::Epic
                    && weapon.colors == faction.colors
                    && weapon.is_always_available()
            })
            .map(|weapon| weapon.id)
    }
}

/// Stat with the largest summed level bonus; the first seen wins ties
pub(crate) fn primary_stat(level_stats: &[(String, i64)]) -> Option<String> {
    let mut totals: IndexMap<&str, i64> = IndexMap::new();
    for (stat, amount) in level_stats {
        *totals.entry(stat.as_str()).or_insert(0) += amount;
    }
    let mut best: Option<(&str, i64)> = None;
    for (stat, total) in totals {
        if best.map_or(true, |(_, top)| total > top) {
            best = Some((stat, total));
        }
    }
    best.map(|(stat, _)| stat.to_string())
}
