//! Id-keyed entity tables

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Arena of entities of one kind, keyed by their id
///
/// Preserves dump order, which several derivations depend on
/// (e.g. "last matching weapon in raw order").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<K: Hash + Eq, T> {
    rows: IndexMap<K, T>,
}

impl<K: Hash + Eq, T> Default for Table<K, T> {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, T> Table<K, T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, returning the row it replaced
    pub fn insert(&mut self, key: K, row: T) -> Option<T> {
        self.rows.insert(key, row)
    }

    /// Get a row by key
    pub fn get(&self, key: &K) -> Option<&T> {
        self.rows.get(key)
    }

    /// Get a mutable reference to a row
    pub fn get_mut(&mut self, key: &K) -> Option<&mut T> {
        self.rows.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Iterate rows in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.keys()
    }

    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
