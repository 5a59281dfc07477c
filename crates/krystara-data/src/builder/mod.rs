//! Multi-pass entity graph builder
//!
//! Construction runs as a fixed sequence of [`Pass`]es. Each pass reads the
//! tables earlier passes filled and writes only ids back into them, so the
//! ordering is the whole contract: running a pass early is an error rather
//! than a silently half-built graph.

mod collections;
mod enrich;
mod passes;

pub use collections::NON_CRAFTABLE_WEAPON_IDS;

use crate::error::{Error, Result};
use crate::loader::RawData;
use crate::schema::EconomyModel;
use krystara_core::{EntityGraph, Table};
use std::fmt;
use std::hash::Hash;

/// One step of graph construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Spells,
    Traits,
    Troops,
    Kingdoms,
    Weapons,
    Pets,
    TalentTrees,
    Classes,
    ReleaseDates,
    KingdomEnrichment,
    DerivedCollections,
}

impl Pass {
    /// The only order passes may run in
    pub const ORDER: [Pass; 11] = [
        Pass::Spells,
        Pass::Traits,
        Pass::Troops,
        Pass::Kingdoms,
        Pass::Weapons,
        Pass::Pets,
        Pass::TalentTrees,
        Pass::Classes,
        Pass::ReleaseDates,
        Pass::KingdomEnrichment,
        Pass::DerivedCollections,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pass::Spells => "spells",
            Pass::Traits => "traits",
            Pass::Troops => "troops",
            Pass::Kingdoms => "kingdoms",
            Pass::Weapons => "weapons",
            Pass::Pets => "pets",
            Pass::TalentTrees => "talent_trees",
            Pass::Classes => "classes",
            Pass::ReleaseDates => "release_dates",
            Pass::KingdomEnrichment => "kingdom_enrichment",
            Pass::DerivedCollections => "derived_collections",
        }
    }

    /// The pass that must have completed before this one
    pub fn previous(&self) -> Option<Pass> {
        let index = Self::ORDER.iter().position(|p| p == self)?;
        index.checked_sub(1).map(|i| Self::ORDER[i])
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds an [`EntityGraph`] from raw dumps one pass at a time
pub struct GraphBuilder<'a> {
    raw: &'a RawData,
    graph: EntityGraph,
    completed: Vec<Pass>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(raw: &'a RawData) -> Self {
        Self {
            raw,
            graph: EntityGraph::new(),
            completed: Vec::new(),
        }
    }

    /// Run one pass; its predecessor in [`Pass::ORDER`] must already have run
    pub fn run(&mut self, pass: Pass) -> Result<()> {
        if let Some(previous) = pass.previous() {
            if !self.completed.contains(&previous) {
                return Err(Error::PassOrder {
                    pass: pass.name(),
                    requires: previous.name(),
                });
            }
        }
        let count = match pass {
            Pass::Spells => self.build_spells()?,
            Pass::Traits => self.build_traits()?,
            Pass::Troops => self.build_troops()?,
            Pass::Kingdoms => self.build_kingdoms()?,
            Pass::Weapons => self.build_weapons()?,
            Pass::Pets => self.build_pets()?,
            Pass::TalentTrees => self.build_talent_trees()?,
            Pass::Classes => self.build_classes()?,
            Pass::ReleaseDates => self.apply_release_dates()?,
            Pass::KingdomEnrichment => self.enrich_kingdoms()?,
            Pass::DerivedCollections => self.derive_collections()?,
        };
        tracing::debug!(pass = pass.name(), count, "pass complete");
        self.completed.push(pass);
        Ok(())
    }

    /// The passes run so far, in order
    pub fn completed(&self) -> &[Pass] {
        &self.completed
    }

    /// Inspect the graph mid-construction
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Hand out the graph once every pass has run
    pub fn finish(self) -> Result<EntityGraph> {
        if let Some(missing) = Pass::ORDER.iter().find(|p| !self.completed.contains(p)) {
            return Err(Error::PassOrder {
                pass: "finish",
                requires: missing.name(),
            });
        }
        Ok(self.graph)
    }

    fn economy(&self) -> Result<&'a EconomyModel> {
        self.raw
            .user
            .economy
            .as_ref()
            .ok_or_else(|| Error::MissingField("pEconomyModel".to_string()))
    }
}

/// Build the full graph, running every pass in order
pub fn build(raw: &RawData) -> Result<EntityGraph> {
    let mut builder = GraphBuilder::new(raw);
    for pass in Pass::ORDER {
        builder.run(pass)?;
    }
    let graph = builder.finish()?;
    tracing::info!(
        troops = graph.troops.len() - 1,
        kingdoms = graph.kingdoms.len(),
        weapons = graph.weapons.len(),
        classes = graph.classes.len(),
        "entity graph built"
    );
    Ok(graph)
}

/// A required top-level array
fn require<'r, T>(field: &'r Option<Vec<T>>, name: &str) -> Result<&'r [T]> {
    field
        .as_deref()
        .ok_or_else(|| Error::MissingField(name.to_string()))
}

/// An optional array; absence builds as empty
fn optional<'r, T>(field: &'r Option<Vec<T>>, name: &str) -> &'r [T] {
    match field.as_deref() {
        Some(items) => items,
        None => {
            tracing::debug!(field = name, "optional array absent, using empty");
            &[]
        }
    }
}

fn insert_unique<K, T>(table: &mut Table<K, T>, key: K, row: T, what: &str) -> Result<()>
where
    K: Hash + Eq + fmt::Display,
{
    if table.contains(&key) {
        return Err(Error::DuplicateDefinition(format!("{} {}", what, key)));
    }
    table.insert(key, row);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Loader;
    use krystara_core::EntityId;

    fn raw(world: &str, user: &str) -> RawData {
        let mut loader = Loader::new();
        loader.load_world_str(world).unwrap();
        loader.load_user_str(user).unwrap();
        loader.finish().unwrap()
    }

    const EMPTY_WORLD: &str = r#"{
        "Spells": [], "Traits": [], "Troops": [], "Kingdoms": [],
        "Weapons": [], "Pets": [], "TalentTrees": [], "HeroClasses": []
    }"#;

    #[test]
    fn test_pass_order_is_linear() {
        assert_eq!(Pass::Spells.previous(), None);
        assert_eq!(Pass::Troops.previous(), Some(Pass::Traits));
        assert_eq!(Pass::DerivedCollections.previous(), Some(Pass::KingdomEnrichment));
    }

    #[test]
    fn test_out_of_order_pass_rejected() {
        let raw = raw(EMPTY_WORLD, r#"{"pEconomyModel": {}}"#);
        let mut builder = GraphBuilder::new(&raw);
        let err = builder.run(Pass::Troops).unwrap_err();
        assert!(matches!(
            err,
            Error::PassOrder {
                pass: "troops",
                requires: "traits"
            }
        ));
    }

    #[test]
    fn test_finish_requires_all_passes() {
        let raw = raw(EMPTY_WORLD, r#"{"pEconomyModel": {}}"#);
        let mut builder = GraphBuilder::new(&raw);
        builder.run(Pass::Spells).unwrap();
        assert!(builder.finish().is_err());
    }

    #[test]
    fn test_build_empty_world() {
        let raw = raw(EMPTY_WORLD, r#"{"pEconomyModel": {}}"#);
        let graph = build(&raw).unwrap();
        assert_eq!(graph.troops.len(), 1);
        assert!(graph.spoilers.is_empty());
    }

    #[test]
    fn test_missing_required_array() {
        let raw = raw(r#"{"Spells": []}"#, r#"{"pEconomyModel": {}}"#);
        assert!(matches!(build(&raw), Err(Error::MissingField(f)) if f == "Traits"));
    }

    #[test]
    fn test_missing_economy_model() {
        let raw = raw(EMPTY_WORLD, "{}");
        assert!(matches!(build(&raw), Err(Error::MissingField(f)) if f == "pEconomyModel"));
    }

    mod fixture_world {
        use crate::fixtures;
        use krystara_core::{
            EntityId, EventKind, KingdomLocation, Rarity, SpoilerKind, TaskLevel,
        };

        #[test]
        fn test_linked_kingdoms_are_mutual() {
            let graph = fixtures::graph().unwrap();
            for kingdom in graph.kingdoms.iter() {
                if let Some(linked) = kingdom.linked_kingdom_id {
                    let other = graph.kingdom(linked).unwrap();
                    assert_eq!(other.linked_kingdom_id, Some(kingdom.id));
                }
            }
            let dark = graph.kingdom(EntityId(3101)).unwrap();
            assert_eq!(dark.linked_kingdom_id, Some(EntityId(3000)));
            assert_eq!(dark.location, KingdomLocation::Underworld);
        }

        #[test]
        fn test_troop_kingdom_back_reference() {
            let graph = fixtures::graph().unwrap();
            let troop = graph.troop(EntityId(6251)).unwrap();
            assert_eq!(troop.kingdom_id, Some(EntityId(3000)));
            assert_eq!(troop.colors.as_slice(), ["blue", "purple"]);
        }

        #[test]
        fn test_unknown_rarity_falls_back() {
            let graph = fixtures::graph().unwrap();
            let troop = graph.troop(EntityId(6800)).unwrap();
            assert_eq!(troop.rarity, Rarity::FALLBACK);
            assert_eq!(troop.raw_rarity, "Sparkly");
            assert_eq!(graph.troop(EntityId(6699)).unwrap().rarity, Rarity::UltraRare);
        }

        #[test]
        fn test_spell_effects_and_boost() {
            let graph = fixtures::graph().unwrap();
            assert_eq!(graph.spell(EntityId(2001)).unwrap().effects.len(), 1);
            let breath = graph.spell(EntityId(2002)).unwrap();
            assert_eq!(breath.boost, Some(2.0));
            assert_eq!(breath.effects[0].multiplier, 2.0);
        }

        #[test]
        fn test_banner_colors_sorted_by_magnitude() {
            let graph = fixtures::graph().unwrap();
            let banner = graph.banners.get(&EntityId(3000)).unwrap();
            let order: Vec<&str> = banner.colors.iter().map(|(c, _)| c.as_str()).collect();
            assert_eq!(order, ["purple", "blue", "red"]);
            assert_eq!(banner.filename, "Banners_BrokenSpire_full.png");

            // equal magnitudes keep dump order
            let zaejin = graph.banners.get(&EntityId(3010)).unwrap();
            assert_eq!(zaejin.colors[0].0, "red");
            assert_eq!(zaejin.colors[1].0, "yellow");
        }

        #[test]
        fn test_kingdom_enrichment() {
            let graph = fixtures::graph().unwrap();
            let spire = graph.kingdom(EntityId(3000)).unwrap();
            assert_eq!(spire.primary_color.as_deref(), Some("purple"));
            assert_eq!(spire.primary_stat.as_deref(), Some("Armor"));
            assert_eq!(spire.pet_id, Some(EntityId(7001)));
            assert_eq!(spire.weapon_ids.len(), 3);

            let zaejin = graph.kingdom(EntityId(3010)).unwrap();
            assert_eq!(zaejin.class_id, Some(EntityId(14007)));
            assert_eq!(zaejin.primary_stat.as_deref(), Some("Magic"));

            let dark = graph.kingdom(EntityId(3101)).unwrap();
            assert_eq!(dark.pet_id, Some(EntityId(7000)));
        }

        #[test]
        fn test_faction_weapon_is_last_matching() {
            let graph = fixtures::graph().unwrap();
            let dark = graph.kingdom(EntityId(3101)).unwrap();
            // 1070 also matches but comes earlier; 1080 needs mastery
            assert_eq!(dark.event_weapon_id, Some(EntityId(1075)));
            assert_eq!(graph.kingdom(EntityId(3000)).unwrap().event_weapon_id, None);
        }

        #[test]
        fn test_class_links_talent_trees() {
            let graph = fixtures::graph().unwrap();
            let class = graph.classes.get(&EntityId(14007)).unwrap();
            assert_eq!(class.talent_trees.len(), 3);
            for code in &class.talent_trees {
                let tree = graph.talent_trees.get(code).unwrap();
                assert_eq!(tree.class_ids, vec![EntityId(14007)]);
                assert_eq!(tree.talents.len(), 7);
            }
        }

        #[test]
        fn test_spoilers_sorted_by_date() {
            let graph = fixtures::graph().unwrap();
            assert_eq!(graph.spoilers.len(), 7);
            assert!(graph.spoilers.windows(2).all(|w| w[0].date <= w[1].date));
            assert!(graph
                .spoilers
                .iter()
                .any(|s| s.kind == SpoilerKind::Room && s.id == EntityId(1)));
            let troop = graph.troop(EntityId(6007)).unwrap();
            assert!(troop.release_date.is_some());
        }

        #[test]
        fn test_mythic_release_synthesizes_event() {
            let graph = fixtures::graph().unwrap();
            let promo = graph
                .events
                .iter()
                .find(|e| e.kind == EventKind::MythicPromotion)
                .unwrap();
            assert_eq!(promo.troop_id, Some(EntityId(6007)));
            assert!(promo.window.is_weekly());
            assert!(graph.events.windows(2).all(|w| w[0].window.start <= w[1].window.start));
        }

        #[test]
        fn test_weekly_event_weapon_candidates() {
            let graph = fixtures::graph().unwrap();
            let weekly = graph
                .events
                .iter()
                .find(|e| e.kind == EventKind::Kingdom)
                .unwrap();
            // 1099 is never craftable and 1210 is released after the event
            assert_eq!(weekly.weapon_candidates, vec![EntityId(1200)]);
        }

        #[test]
        fn test_derived_collections() {
            let graph = fixtures::graph().unwrap();
            let tasks: Vec<_> = graph.campaign_tasks_for(EntityId(3000)).collect();
            assert_eq!(tasks.len(), 2);
            assert_eq!(tasks[1].level, TaskLevel::Gold);

            let stone = graph.traitstones.get(&EntityId(1)).unwrap();
            assert_eq!(stone.troop_ids, vec![EntityId(6000), EntityId(6950)]);
            assert_eq!(stone.total_amount, 8);

            assert_eq!(graph.adventure_board[0].rewards[0].key, "[GEM_KEYS]");
            assert_eq!(graph.drop_chances["Gem Chest"][1], (Rarity::Mythic, 0.5));
            assert_eq!(graph.event_kingdoms.len(), 2);
            assert_eq!(
                graph.event_kingdoms[1].window.start - graph.event_kingdoms[0].window.start,
                krystara_core::time::week()
            );
        }
    }

    #[test]
    fn test_missing_kingdom_reference_is_fatal() {
        let world = r#"{
            "Spells": [{"Id": 1, "Name": "x"}], "Traits": [], "Troops": [],
            "Kingdoms": [],
            "Weapons": [{"Id": 5, "ReferenceName": "w", "SpellId": 1, "WeaponRarity": "Epic", "KingdomId": 99}],
            "Pets": [], "TalentTrees": [], "HeroClasses": []
        }"#;
        let raw = raw(world, r#"{"pEconomyModel": {}}"#);
        assert!(matches!(build(&raw), Err(Error::DataIntegrity(_))));
    }

    #[test]
    fn test_missing_kingdom_troop_is_fatal() {
        let world = r#"{
            "Spells": [], "Traits": [], "Troops": [],
            "Kingdoms": [{"Id": 3000, "Name": "k", "ReferenceName": "k", "Troops": [6000]}],
            "Weapons": [], "Pets": [], "TalentTrees": [], "HeroClasses": []
        }"#;
        let raw = raw(world, r#"{"pEconomyModel": {}}"#);
        assert!(matches!(build(&raw), Err(Error::DataIntegrity(_))));
    }

    fn linked_world(links: &[(u32, Option<u32>)]) -> String {
        let kingdoms: Vec<String> = links
            .iter()
            .map(|(id, link)| {
                let link = link.map_or("null".to_string(), |l| l.to_string());
                format!(
                    r#"{{"Id": {id}, "Name": "k{id}", "ReferenceName": "k{id}", "Troops": [], "LinkedKingdomId": {link}}}"#
                )
            })
            .collect();
        format!(
            r#"{{"Spells": [], "Traits": [], "Troops": [], "Kingdoms": [{}],
                "Weapons": [], "Pets": [], "TalentTrees": [], "HeroClasses": []}}"#,
            kingdoms.join(", ")
        )
    }

    #[test]
    fn test_one_sided_link_becomes_mutual() {
        let one_sided = raw(&linked_world(&[(1, Some(2)), (2, None)]), r#"{"pEconomyModel": {}}"#);
        let graph = build(&one_sided).unwrap();
        assert_eq!(graph.kingdom(EntityId(1)).unwrap().linked_kingdom_id, Some(EntityId(2)));
        assert_eq!(graph.kingdom(EntityId(2)).unwrap().linked_kingdom_id, Some(EntityId(1)));

        let both_sides = raw(&linked_world(&[(1, Some(2)), (2, Some(1))]), r#"{"pEconomyModel": {}}"#);
        assert!(build(&both_sides).is_ok());
    }

    #[test]
    fn test_chained_link_is_fatal() {
        let world = linked_world(&[(1, Some(2)), (2, Some(3)), (3, None)]);
        let raw = raw(&world, r#"{"pEconomyModel": {}}"#);
        assert!(matches!(build(&raw), Err(Error::DataIntegrity(_))));
    }

    #[test]
    fn test_two_kingdoms_claiming_one_partner_is_fatal() {
        let world = linked_world(&[(1, Some(3)), (2, Some(3)), (3, None)]);
        let raw = raw(&world, r#"{"pEconomyModel": {}}"#);
        assert!(matches!(build(&raw), Err(Error::DataIntegrity(_))));
    }

    #[test]
    fn test_unknown_affixes_are_skipped() {
        let world = r#"{
            "Spells": [{"Id": 1, "Name": "a"}, {"Id": 2, "Name": "b"}],
            "Traits": [], "Troops": [],
            "Kingdoms": [{"Id": 3000, "Name": "k", "ReferenceName": "k", "Troops": []}],
            "Weapons": [{"Id": 5, "ReferenceName": "w", "SpellId": 1, "WeaponRarity": "Epic",
                         "Affixes": [2, 999, 1], "KingdomId": 3000}],
            "Pets": [], "TalentTrees": [], "HeroClasses": []
        }"#;
        let graph = build(&raw(world, r#"{"pEconomyModel": {}}"#)).unwrap();
        let weapon = graph.weapons.get(&EntityId(5)).unwrap();
        assert_eq!(weapon.affixes, vec![EntityId(2), EntityId(1)]);
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let world = r#"{
            "Spells": [{"Id": 1, "Name": "a"}, {"Id": 1, "Name": "b"}],
            "Traits": [], "Troops": [], "Kingdoms": [],
            "Weapons": [], "Pets": [], "TalentTrees": [], "HeroClasses": []
        }"#;
        let raw = raw(world, r#"{"pEconomyModel": {}}"#);
        assert!(matches!(build(&raw), Err(Error::DuplicateDefinition(_))));
    }
}
