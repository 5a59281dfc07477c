//! Identity types for indexed entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer identifier of an entity within its own namespace
///
/// Ids are only unique per [`Namespace`]: troop 6000 and kingdom 6000 may both exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Sentinel id of the placeholder troop
    pub const PLACEHOLDER: EntityId = EntityId(u32::MAX);

    /// Create a new entity ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Parse a query string that is nothing but digits
    pub fn parse_numeric(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().map(Self)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Identifier for code-keyed entities (traits, talent trees)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefId(pub String);

impl DefId {
    /// Create a new definition ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DefId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DefId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The id-space an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Troop,
    Weapon,
    Kingdom,
    Class,
    Banner,
    Pet,
    Spell,
    Trait,
    TalentTree,
    Traitstone,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Troop => "troop",
            Namespace::Weapon => "weapon",
            Namespace::Kingdom => "kingdom",
            Namespace::Class => "class",
            Namespace::Banner => "banner",
            Namespace::Pet => "pet",
            Namespace::Spell => "spell",
            Namespace::Trait => "trait",
            Namespace::TalentTree => "talent_tree",
            Namespace::Traitstone => "traitstone",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
