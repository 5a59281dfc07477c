//! Flat key/value records handed to translation, search and presentation
//!
//! Every human-facing string starts out as the dump's bracketed translation key.
//! The untranslated originals that later passes still need are kept alongside
//! under `raw_*` names, so a translated record can be translated again.

use crate::entities::{Banner, HeroClass, Kingdom, Pet, Spell, TalentTree, Trait, Troop, Weapon};
use crate::value::lookup_path;
use crate::{EntityGraph, EntityId, Namespace, Value, ValueMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rendered entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: Namespace,
    pub fields: ValueMap,
}

impl Record {
    pub fn new(kind: Namespace) -> Self {
        Self {
            kind,
            fields: ValueMap::new(),
        }
    }

    /// Builder-style field insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The display name, empty if the record has none
    pub fn name(&self) -> &str {
        self.get_str("name").unwrap_or_default()
    }

    pub fn id(&self) -> Option<EntityId> {
        self.get("id")
            .and_then(Value::as_int)
            .and_then(|id| u32::try_from(id).ok())
            .map(EntityId)
    }

    /// Values at a dotted path, see [`lookup_path`]
    pub fn path(&self, path: &str) -> Vec<&Value> {
        lookup_path(&self.fields, path)
    }
}

/// An entity that can be listed, searched and rendered
pub trait Indexed {
    const KIND: Namespace;

    /// The id numeric queries match against, if the kind has integer ids
    fn numeric_id(&self) -> Option<EntityId>;

    fn reference_name(&self) -> &str;

    fn release_date(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Render into an untranslated record
    fn to_record(&self, graph: &EntityGraph) -> Record;
}

/// Translation key of a troop type
pub fn type_key(raw: &str) -> String {
    format!("[TROOPTYPE_{}]", raw.to_uppercase())
}

/// Translation key of a troop or weapon role
pub fn role_key(raw: &str) -> String {
    format!("[TROOP_ROLE_{}]", raw.to_uppercase())
}

fn summary(id: impl Into<Value>, name: &str, reference_name: &str) -> Value {
    let mut map = ValueMap::new();
    map.insert("id".into(), id.into());
    map.insert("name".into(), name.into());
    map.insert("reference_name".into(), reference_name.into());
    Value::Map(map)
}

fn kingdom_summary(graph: &EntityGraph, id: Option<EntityId>) -> Value {
    id.and_then(|id| graph.kingdom(id))
        .map(|k| summary(k.id, &k.name, &k.reference_name))
        .unwrap_or_default()
}

fn spell_value(spell: &Spell) -> Value {
    let mut map = ValueMap::new();
    map.insert("id".into(), spell.id.into());
    map.insert("name".into(), spell.name.as_str().into());
    map.insert("description".into(), spell.description.as_str().into());
    map.insert("cost".into(), spell.cost.into());
    map.insert(
        "effects".into(),
        Value::List(
            spell
                .effects
                .iter()
                .map(|e| Value::List(vec![e.multiplier.into(), e.amount.into()]))
                .collect(),
        ),
    );
    map.insert("boost".into(), spell.boost.into());
    Value::Map(map)
}

fn spell_by_id(graph: &EntityGraph, id: EntityId) -> Value {
    graph.spell(id).map(spell_value).unwrap_or_default()
}

fn trait_value(t: &Trait) -> Value {
    let mut map = ValueMap::new();
    map.insert("code".into(), t.code.as_str().into());
    map.insert("name".into(), t.name.as_str().into());
    map.insert("description".into(), t.description.as_str().into());
    map.insert("image".into(), t.image.as_str().into());
    Value::Map(map)
}

fn traits_value<'a>(graph: &EntityGraph, codes: impl IntoIterator<Item = &'a crate::DefId>) -> Value {
    Value::List(
        codes
            .into_iter()
            .filter_map(|code| graph.traits.get(code))
            .map(trait_value)
            .collect(),
    )
}

fn strings(items: &[String], key: fn(&str) -> String) -> Value {
    Value::List(items.iter().map(|s| Value::String(key(s))).collect())
}

fn date_value(date: Option<DateTime<Utc>>) -> Value {
    date.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
        .unwrap_or_default()
}

fn colors_value(colors: &crate::ColorSet) -> Value {
    colors.iter().collect::<Vec<_>>().into()
}

impl Indexed for Troop {
    const KIND: Namespace = Namespace::Troop;

    fn numeric_id(&self) -> Option<EntityId> {
        Some(self.id)
    }

    fn reference_name(&self) -> &str {
        &self.reference_name
    }

    fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    fn to_record(&self, graph: &EntityGraph) -> Record {
        Record::new(Self::KIND)
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("reference_name", self.reference_name.as_str())
            .with("description", self.description.as_str())
            .with("colors", colors_value(&self.colors))
            .with("rarity", self.rarity.translation_key())
            .with("raw_rarity", self.raw_rarity.as_str())
            .with("types", strings(&self.types, type_key))
            .with("raw_types", self.types.clone())
            .with("roles", strings(&self.roles, role_key))
            .with("raw_roles", self.roles.clone())
            .with("kingdom", kingdom_summary(graph, self.kingdom_id))
            .with("spell", spell_by_id(graph, self.spell_id))
            .with("traits", traits_value(graph, &self.traits))
            .with("release_date", date_value(self.release_date))
    }
}

impl Indexed for Weapon {
    const KIND: Namespace = Namespace::Weapon;

    fn numeric_id(&self) -> Option<EntityId> {
        Some(self.id)
    }

    fn reference_name(&self) -> &str {
        &self.reference_name
    }

    fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    fn to_record(&self, graph: &EntityGraph) -> Record {
        let affixes: Vec<Value> = self
            .affixes
            .iter()
            .filter_map(|id| graph.spell(*id))
            .map(spell_value)
            .collect();
        Record::new(Self::KIND)
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("reference_name", self.reference_name.as_str())
            .with("description", self.description.as_str())
            .with("colors", colors_value(&self.colors))
            .with("rarity", self.rarity.translation_key())
            .with("raw_rarity", self.raw_rarity.as_str())
            .with("roles", strings(&self.roles, role_key))
            .with("raw_roles", self.roles.clone())
            .with("kingdom", kingdom_summary(graph, Some(self.kingdom_id)))
            .with("spell", spell_by_id(graph, self.spell_id))
            .with("affixes", Value::List(affixes))
            .with("mastery_requirement", self.mastery_requirement)
            .with("release_date", date_value(self.release_date))
    }
}

impl Indexed for Kingdom {
    const KIND: Namespace = Namespace::Kingdom;

    fn numeric_id(&self) -> Option<EntityId> {
        Some(self.id)
    }

    fn reference_name(&self) -> &str {
        &self.reference_name
    }

    fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    fn to_record(&self, graph: &EntityGraph) -> Record {
        let troops: Vec<Value> = self
            .troop_ids
            .iter()
            .filter_map(|id| graph.troop(*id))
            .map(|t| summary(t.id, &t.name, &t.reference_name))
            .collect();
        let weapons: Vec<Value> = self
            .weapon_ids
            .iter()
            .filter_map(|id| graph.weapons.get(id))
            .map(|w| summary(w.id, &w.name, &w.reference_name))
            .collect();
        let class = self
            .class_id
            .and_then(|id| graph.classes.get(&id))
            .map(|c| summary(c.id, &c.name, &c.reference_name))
            .unwrap_or_default();
        let event_weapon = self
            .event_weapon_id
            .and_then(|id| graph.weapons.get(&id))
            .map(|w| summary(w.id, &w.name, &w.reference_name))
            .unwrap_or_default();
        let pet = self
            .pet_id
            .and_then(|id| graph.pets.get(&id))
            .map(|p| summary(p.id, &p.name, &p.reference_name))
            .unwrap_or_default();
        let banner = graph
            .banners
            .get(&self.id)
            .map(|b| Value::Map(b.to_record(graph).fields))
            .unwrap_or_default();
        Record::new(Self::KIND)
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("reference_name", self.reference_name.as_str())
            .with("description", self.description.as_str())
            .with("colors", colors_value(&self.colors))
            .with("location", self.location.as_str())
            .with("linked_kingdom", kingdom_summary(graph, self.linked_kingdom_id))
            .with("troops", Value::List(troops))
            .with("weapons", Value::List(weapons))
            .with("class", class)
            .with("event_weapon", event_weapon)
            .with("pet", pet)
            .with("primary_color", self.primary_color.clone())
            .with("primary_stat", self.primary_stat.clone())
            .with("banner", banner)
            .with("release_date", date_value(self.release_date))
    }
}

impl Indexed for HeroClass {
    const KIND: Namespace = Namespace::Class;

    fn numeric_id(&self) -> Option<EntityId> {
        Some(self.id)
    }

    fn reference_name(&self) -> &str {
        &self.reference_name
    }

    fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    fn to_record(&self, graph: &EntityGraph) -> Record {
        let weapon = graph
            .weapons
            .get(&self.weapon_id)
            .map(|w| summary(w.id, &w.name, &w.reference_name))
            .unwrap_or_default();
        let trees: Vec<Value> = self
            .talent_trees
            .iter()
            .filter_map(|code| graph.talent_trees.get(code))
            .map(|tree| Value::Map(tree.to_record(graph).fields))
            .collect();
        Record::new(Self::KIND)
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("reference_name", self.reference_name.as_str())
            .with("type", self.class_type.as_str())
            .with("kingdom", kingdom_summary(graph, Some(self.kingdom_id)))
            .with("weapon", weapon)
            .with("talent_trees", Value::List(trees))
            .with("traits", traits_value(graph, &self.traits))
            .with("release_date", date_value(self.release_date))
    }
}

impl Indexed for Pet {
    const KIND: Namespace = Namespace::Pet;

    fn numeric_id(&self) -> Option<EntityId> {
        Some(self.id)
    }

    fn reference_name(&self) -> &str {
        &self.reference_name
    }

    fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    fn to_record(&self, graph: &EntityGraph) -> Record {
        Record::new(Self::KIND)
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("reference_name", self.reference_name.as_str())
            .with("colors", colors_value(&self.colors))
            .with("effect", self.effect.as_str())
            .with("effect_data", self.effect_data.clone())
            .with("kingdom", kingdom_summary(graph, Some(self.kingdom_id)))
            .with("release_date", date_value(self.release_date))
    }
}

impl Indexed for Trait {
    const KIND: Namespace = Namespace::Trait;

    fn numeric_id(&self) -> Option<EntityId> {
        None
    }

    fn reference_name(&self) -> &str {
        self.code.as_str()
    }

    fn to_record(&self, _graph: &EntityGraph) -> Record {
        let mut record = Record::new(Self::KIND);
        if let Value::Map(fields) = trait_value(self) {
            record.fields = fields;
        }
        record.with("reference_name", self.code.as_str())
    }
}

impl Indexed for TalentTree {
    const KIND: Namespace = Namespace::TalentTree;

    fn numeric_id(&self) -> Option<EntityId> {
        None
    }

    fn reference_name(&self) -> &str {
        self.code.as_str()
    }

    fn to_record(&self, graph: &EntityGraph) -> Record {
        let talents: Vec<Value> = self
            .talents
            .iter()
            .map(|talent| {
                let mut map = ValueMap::new();
                map.insert("code".into(), talent.code.as_str().into());
                map.insert("name".into(), talent.name.as_str().into());
                map.insert("description".into(), talent.description.as_str().into());
                Value::Map(map)
            })
            .collect();
        let classes: Vec<Value> = self
            .class_ids
            .iter()
            .filter_map(|id| graph.classes.get(id))
            .map(|c| summary(c.id, &c.name, &c.reference_name))
            .collect();
        // Trees have no display name of their own; the first talent names them
        let name = self
            .talents
            .first()
            .map(|t| t.name.as_str())
            .unwrap_or(self.code.as_str());
        Record::new(Self::KIND)
            .with("code", self.code.as_str())
            .with("name", name)
            .with("reference_name", self.code.as_str())
            .with("talents", Value::List(talents))
            .with("classes", Value::List(classes))
    }
}

impl Indexed for Banner {
    const KIND: Namespace = Namespace::Banner;

    fn numeric_id(&self) -> Option<EntityId> {
        Some(self.id)
    }

    fn reference_name(&self) -> &str {
        &self.filename
    }

    fn to_record(&self, _graph: &EntityGraph) -> Record {
        let colors: Vec<Value> = self
            .colors
            .iter()
            .map(|(color, magnitude)| {
                let mut map = ValueMap::new();
                map.insert("color".into(), color.as_str().into());
                map.insert("magnitude".into(), (*magnitude).into());
                Value::Map(map)
            })
            .collect();
        Record::new(Self::KIND)
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("colors", Value::List(colors))
            .with("filename", self.filename.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UNKNOWN_NAME;

    #[test]
    fn test_keys() {
        assert_eq!(type_key("Goblin"), "[TROOPTYPE_GOBLIN]");
        assert_eq!(role_key("Healer"), "[TROOP_ROLE_HEALER]");
    }

    #[test]
    fn test_placeholder_record() {
        let graph = EntityGraph::new();
        let record = graph.placeholder_troop().to_record(&graph);
        assert_eq!(record.kind, Namespace::Troop);
        assert_eq!(record.name(), UNKNOWN_NAME);
        assert_eq!(record.id(), Some(EntityId::PLACEHOLDER));
        assert!(record.get("kingdom").unwrap().is_null());
    }

    #[test]
    fn test_locked_banner_record() {
        let graph = EntityGraph::new();
        let record = Banner::locked().to_record(&graph);
        assert_eq!(record.name(), UNKNOWN_NAME);
        assert_eq!(record.get("colors"), Some(&Value::List(Vec::new())));
    }

    #[test]
    fn test_record_path() {
        let mut kingdom = ValueMap::new();
        kingdom.insert("name".into(), "Zaejin".into());
        let record = Record::new(Namespace::Troop).with("kingdom", Value::Map(kingdom));
        assert_eq!(record.path("kingdom.name"), vec![&Value::from("Zaejin")]);
    }
}
