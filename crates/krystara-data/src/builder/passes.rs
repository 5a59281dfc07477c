//! Passes that turn raw rows into entity tables

use super::{insert_unique, require, GraphBuilder};
use crate::error::{Error, Result};
use crate::schema::world::{RawKingdom, RawSpellStep};
use krystara_core::{
    color_name, Banner, ColorSet, DefId, EntityId, HeroClass, Kingdom, KingdomLocation, Pet,
    PetEffect, Rarity, Spell, SpellEffect, Talent, TalentTree, Trait, TraitstoneCost, Troop,
    Weapon,
};

/// Troops carry at most this many types
const MAX_TROOP_TYPES: usize = 2;

/// Step types prefixed with this only scale the spell, they deal nothing
const COUNT_STEP_PREFIX: &str = "Count";

impl GraphBuilder<'_> {
    pub(super) fn build_spells(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let spells = require(&raw_data.world.spells, "Spells")?;
        for raw in spells {
            let (effects, boost) = parse_spell_steps(&raw.spell_steps);
            let spell = Spell {
                id: EntityId(raw.id),
                name: raw.name.clone(),
                description: raw.description.clone(),
                cost: raw.cost,
                effects,
                boost,
            };
            insert_unique(&mut self.graph.spells, spell.id, spell, "spell")?;
        }
        Ok(spells.len())
    }

    pub(super) fn build_traits(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let traits = require(&raw_data.world.traits, "Traits")?;
        for raw in traits {
            let code = DefId::new(&raw.code);
            let row = Trait {
                code: code.clone(),
                name: raw.name.clone(),
                description: raw.description.clone(),
                image: raw.image.clone().unwrap_or_else(|| raw.code.clone()),
            };
            insert_unique(&mut self.graph.traits, code, row, "trait")?;
        }
        Ok(traits.len())
    }

    pub(super) fn build_troops(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let troops = require(&raw_data.world.troops, "Troops")?;
        for raw in troops {
            let id = EntityId(raw.id);
            if id == EntityId::PLACEHOLDER {
                return Err(Error::DataIntegrity(format!(
                    "troop id {} is reserved for the placeholder",
                    raw.id
                )));
            }
            let spell_id = EntityId(raw.spell_id);
            if !self.graph.spells.contains(&spell_id) {
                tracing::warn!(troop = raw.id, spell = raw.spell_id, "troop spell not found");
            }

            let mut traits = Vec::with_capacity(raw.traits.len());
            for code in &raw.traits {
                let code = DefId::new(code);
                if !self.graph.traits.contains(&code) {
                    tracing::warn!(troop = raw.id, %code, "troop trait not found");
                }
                traits.push(code);
            }

            let mut types = raw.troop_types.clone();
            if types.len() > MAX_TROOP_TYPES {
                tracing::warn!(troop = raw.id, count = types.len(), "too many troop types, truncating");
                types.truncate(MAX_TROOP_TYPES);
            }

            let troop = Troop {
                id,
                name: raw.name.clone(),
                reference_name: raw.reference_name.clone(),
                description: raw.description.clone(),
                colors: flags(&raw.mana_colors),
                rarity: Rarity::parse(&raw.troop_rarity),
                raw_rarity: raw.troop_rarity.clone(),
                types,
                roles: raw.troop_roles.clone(),
                spell_id,
                traits,
                traitstones: raw
                    .trait_stones
                    .iter()
                    .map(|cost| TraitstoneCost {
                        traitstone_id: EntityId(cost.id),
                        amount: cost.amount,
                    })
                    .collect(),
                kingdom_id: None,
                release_date: None,
            };
            insert_unique(&mut self.graph.troops, id, troop, "troop")?;
        }
        Ok(troops.len())
    }

    pub(super) fn build_kingdoms(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let kingdoms = require(&raw_data.world.kingdoms, "Kingdoms")?;
        for raw in kingdoms {
            let id = EntityId(raw.id);
            let mut troop_ids = Vec::with_capacity(raw.troops.len());
            for &troop_id in &raw.troops {
                let troop_id = EntityId(troop_id);
                let troop = self
                    .graph
                    .troops
                    .get_mut(&troop_id)
                    .filter(|t| !t.is_placeholder())
                    .ok_or_else(|| {
                        Error::DataIntegrity(format!(
                            "kingdom {} references missing troop {}",
                            raw.id, troop_id
                        ))
                    })?;
                match troop.kingdom_id {
                    None => troop.kingdom_id = Some(id),
                    Some(existing) if existing != id => {
                        tracing::debug!(troop = %troop_id, kingdom = raw.id, %existing, "troop listed by several kingdoms, keeping first");
                    }
                    Some(_) => {}
                }
                troop_ids.push(troop_id);
            }

            if let Some(banner) = build_banner(raw) {
                insert_unique(&mut self.graph.banners, id, banner, "banner")?;
            }

            let kingdom = Kingdom {
                id,
                name: raw.name.clone(),
                reference_name: raw.reference_name.clone(),
                description: raw.description.clone(),
                colors: flags(&raw.mana_colors),
                location: location(raw),
                troop_ids,
                weapon_ids: Vec::new(),
                linked_kingdom_id: None,
                level_stats: raw
                    .level_data
                    .iter()
                    .map(|level| (level.stat.clone(), level.amount))
                    .collect(),
                release_date: None,
                class_id: None,
                event_weapon_id: None,
                pet_id: None,
                primary_color: None,
                primary_stat: None,
            };
            insert_unique(&mut self.graph.kingdoms, id, kingdom, "kingdom")?;
        }
        self.link_kingdoms(kingdoms)?;
        Ok(kingdoms.len())
    }

    /// Make every link mutual: if A names B, B points back at A
    ///
    /// A kingdom has at most one partner, so a link that contradicts an
    /// earlier one on either side is fatal.
    fn link_kingdoms(&mut self, kingdoms: &[RawKingdom]) -> Result<()> {
        for raw in kingdoms {
            let Some(target) = raw.linked_kingdom_id else {
                continue;
            };
            let (id, target) = (EntityId(raw.id), EntityId(target));
            if id == target {
                tracing::warn!(kingdom = %id, "kingdom links to itself, ignoring");
                continue;
            }
            let Some(other) = self.graph.kingdoms.get(&target) else {
                return Err(Error::DataIntegrity(format!(
                    "kingdom {} links to missing kingdom {}",
                    id, target
                )));
            };
            let partner_of_target = other.linked_kingdom_id;
            let partner_of_source = self
                .graph
                .kingdoms
                .get(&id)
                .and_then(|kingdom| kingdom.linked_kingdom_id);
            for (kingdom, partner, wanted) in
                [(target, partner_of_target, id), (id, partner_of_source, target)]
            {
                if let Some(existing) = partner.filter(|&existing| existing != wanted) {
                    return Err(Error::DataIntegrity(format!(
                        "kingdom {} is linked to {} and {}",
                        kingdom, existing, wanted
                    )));
                }
            }
            for (kingdom, partner) in [(id, target), (target, id)] {
                if let Some(kingdom) = self.graph.kingdoms.get_mut(&kingdom) {
                    kingdom.linked_kingdom_id = Some(partner);
                }
            }
        }
        Ok(())
    }

    pub(super) fn build_weapons(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let weapons = require(&raw_data.world.weapons, "Weapons")?;
        for raw in weapons {
            let id = EntityId(raw.id);
            let kingdom_id = EntityId(raw.kingdom_id);
            let spell_id = EntityId(raw.spell_id);
            let spell = self.graph.spells.get(&spell_id).ok_or_else(|| {
                Error::DataIntegrity(format!("weapon {} references missing spell {}", id, spell_id))
            })?;
            let kingdom = self.graph.kingdoms.get_mut(&kingdom_id).ok_or_else(|| {
                Error::DataIntegrity(format!(
                    "weapon {} references missing kingdom {}",
                    id, kingdom_id
                ))
            })?;
            kingdom.weapon_ids.push(id);

            let affixes = raw
                .affixes
                .iter()
                .map(|&affix| EntityId(affix))
                .filter(|affix| {
                    let known = self.graph.spells.contains(affix);
                    if !known {
                        tracing::warn!(weapon = %id, %affix, "unknown weapon affix, skipping");
                    }
                    known
                })
                .collect();

            let weapon = Weapon {
                id,
                name: spell.name.clone(),
                description: spell.description.clone(),
                reference_name: raw.reference_name.clone(),
                colors: flags(&raw.mana_colors),
                rarity: Rarity::parse(&raw.weapon_rarity),
                raw_rarity: raw.weapon_rarity.clone(),
                roles: raw.weapon_roles.clone(),
                spell_id,
                affixes,
                kingdom_id,
                mastery_requirement: raw.mastery_requirement,
                release_date: None,
            };
            insert_unique(&mut self.graph.weapons, id, weapon, "weapon")?;
        }
        Ok(weapons.len())
    }

    pub(super) fn build_pets(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let pets = require(&raw_data.world.pets, "Pets")?;
        for raw in pets {
            let id = EntityId(raw.id);
            let kingdom_id = EntityId(raw.kingdom_id);
            if !self.graph.kingdoms.contains(&kingdom_id) {
                return Err(Error::DataIntegrity(format!(
                    "pet {} references missing kingdom {}",
                    id, kingdom_id
                )));
            }
            let pet = Pet {
                id,
                name: raw.name.clone(),
                reference_name: raw.reference_name.clone(),
                colors: flags(&raw.mana_colors),
                effect: PetEffect::parse(&raw.effect),
                effect_data: raw.effect_data.clone(),
                kingdom_id,
                release_date: None,
            };
            insert_unique(&mut self.graph.pets, id, pet, "pet")?;
        }
        Ok(pets.len())
    }

    pub(super) fn build_talent_trees(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let trees = require(&raw_data.world.talent_trees, "TalentTrees")?;
        for raw in trees {
            let code = DefId::new(&raw.code);
            let tree = TalentTree {
                code: code.clone(),
                talents: raw
                    .talents
                    .iter()
                    .map(|talent| Talent {
                        code: talent.code.clone(),
                        name: talent.name.clone(),
                        description: talent.description.clone(),
                    })
                    .collect(),
                class_ids: Vec::new(),
            };
            insert_unique(&mut self.graph.talent_trees, code, tree, "talent tree")?;
        }
        Ok(trees.len())
    }

    pub(super) fn build_classes(&mut self) -> Result<usize> {
        let raw_data = self.raw;
        let classes = require(&raw_data.world.hero_classes, "HeroClasses")?;
        for raw in classes {
            let id = EntityId(raw.id);
            let kingdom_id = EntityId(raw.kingdom_id);
            let weapon_id = EntityId(raw.weapon_id);
            if !self.graph.weapons.contains(&weapon_id) {
                return Err(Error::DataIntegrity(format!(
                    "class {} references missing weapon {}",
                    id, weapon_id
                )));
            }
            let kingdom = self.graph.kingdoms.get_mut(&kingdom_id).ok_or_else(|| {
                Error::DataIntegrity(format!(
                    "class {} references missing kingdom {}",
                    id, kingdom_id
                ))
            })?;
            if let Some(existing) = kingdom.class_id {
                tracing::warn!(kingdom = %kingdom_id, %existing, replacement = %id, "kingdom already has a class, overriding");
            }
            kingdom.class_id = Some(id);

            let mut talent_trees = Vec::with_capacity(raw.talent_trees.len());
            for code in &raw.talent_trees {
                let code = DefId::new(code);
                let tree = self.graph.talent_trees.get_mut(&code).ok_or_else(|| {
                    Error::DataIntegrity(format!(
                        "class {} references missing talent tree {}",
                        id, code
                    ))
                })?;
                tree.class_ids.push(id);
                talent_trees.push(code);
            }

            let traits = raw
                .traits
                .iter()
                .map(DefId::new)
                .inspect(|code| {
                    if !self.graph.traits.contains(code) {
                        tracing::warn!(class = %id, %code, "class trait not found");
                    }
                })
                .collect();

            let class = HeroClass {
                id,
                name: raw.name.clone(),
                reference_name: raw.reference_name.clone(),
                class_type: raw.class_type.clone(),
                kingdom_id,
                weapon_id,
                talent_trees,
                traits,
                release_date: None,
            };
            insert_unique(&mut self.graph.classes, id, class, "class")?;
        }
        Ok(classes.len())
    }
}

/// Read spell steps into `(multiplier, amount)` pairs and an optional boost
///
/// `Count*` steps only contribute the boost. A run of consecutive steps of
/// the same type collapses to its first step.
pub(crate) fn parse_spell_steps(steps: &[RawSpellStep]) -> (Vec<SpellEffect>, Option<f64>) {
    let mut effects = Vec::new();
    let mut boost = None;
    let mut last_kind: Option<&str> = None;
    for step in steps {
        if step.kind.starts_with(COUNT_STEP_PREFIX) {
            if let Some(amount) = step.amount {
                boost = Some(amount as f64);
            }
            continue;
        }
        if last_kind == Some(step.kind.as_str()) {
            continue;
        }
        last_kind = Some(step.kind.as_str());
        if step.amount.is_none() && step.spell_power_multiplier.is_none() {
            continue;
        }
        effects.push(SpellEffect {
            multiplier: step.spell_power_multiplier.unwrap_or(1.0),
            amount: step.amount.unwrap_or(0),
        });
    }
    (effects, boost)
}

fn flags(raw: &indexmap::IndexMap<String, bool>) -> ColorSet {
    ColorSet::from_flags(raw.iter().map(|(key, on)| (key.as_str(), *on)))
}

fn location(raw: &RawKingdom) -> KingdomLocation {
    if raw.kingdom_type.as_deref() == Some("Warband") {
        KingdomLocation::Warband
    } else if raw.map_index == 1 {
        KingdomLocation::Underworld
    } else {
        KingdomLocation::Krystara
    }
}

/// Banner colors are ordered by magnitude, strongest first; ties keep dump order
fn build_banner(raw: &RawKingdom) -> Option<Banner> {
    let name = raw.banner_name.as_ref()?;
    let mut colors: Vec<(String, i32)> = raw
        .banner_colors
        .iter()
        .map(|(key, magnitude)| (color_name(key), *magnitude))
        .collect();
    colors.sort_by(|a, b| b.1.cmp(&a.1));
    Some(Banner {
        id: EntityId(raw.id),
        name: name.clone(),
        description: raw.banner_description.clone(),
        colors,
        filename: format!("Banners_{}_full.png", raw.file_base),
    })
}
