//! Krystara Core - entity tables and records for the game-data index
//!
//! This crate provides the types every other krystara crate shares:
//! - Identity types (`EntityId`, `DefId`, `Namespace`)
//! - Typed entities (troops, weapons, kingdoms, classes, pets, ...)
//! - The arena-style `EntityGraph` the builder fills in
//! - Dynamic `Record`s that translation and search operate on
//! - Release dates, event windows and the injectable `TimeSource`
//!
//! Entities reference each other by id only; nothing holds a borrowed
//! alias into another table, so a graph can be cloned or swapped whole.

mod color;
pub mod derived;
pub mod entities;
mod entity;
mod identity;
mod model;
mod rarity;
mod record;
pub mod time;
mod value;

pub use color::{color_name, ColorSet};
pub use derived::{
    AdventureTask, CampaignTask, DropChances, Event, EventKind, EventKingdomWeek, Reward,
    SoulforgeRecipe, Spoiler, SpoilerKind, TaskLevel, Traitstone,
};
pub use entities::{
    Banner, HeroClass, Kingdom, KingdomLocation, Pet, PetEffect, Spell, SpellEffect, Talent,
    TalentTree, Trait, TraitstoneCost, Troop, Weapon, UNKNOWN_NAME,
};
pub use entity::Table;
pub use identity::{DefId, EntityId, Namespace};
pub use model::EntityGraph;
pub use rarity::Rarity;
pub use record::{role_key, type_key, Indexed, Record};
pub use time::{EventWindow, FixedTime, SystemTime, TimeSource};
pub use value::{lookup_path, Value, ValueMap};

pub use chrono;
pub use indexmap::IndexMap;
