//! Name-indexed record storage
//!
//! Records are stored densely and addressed by typed ids. Names are looked up
//! case-insensitively.

use ahash::AHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Index;

use crate::core::error::{EngineError, Result};

/// A rule record with a unique name
pub trait Record {
    /// Name used in tables and messages ("TerrainType", "UnitType", ...)
    const KIND: &'static str;

    fn name(&self) -> &str;
}

/// Normalized lookup key for a record name
pub fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Typed index into a `Table<R>`
///
/// Only the table that minted an id can resolve it.
pub struct RecordId<R> {
    index: u32,
    _marker: PhantomData<fn() -> R>,
}

impl<R> RecordId<R> {
    fn new(index: usize) -> Self {
        Self {
            index: index as u32,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl<R> Clone for RecordId<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for RecordId<R> {}

impl<R> PartialEq for RecordId<R> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<R> Eq for RecordId<R> {}

impl<R> PartialOrd for RecordId<R> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> Ord for RecordId<R> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<R> Hash for RecordId<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<R: Record> fmt::Debug for RecordId<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", R::KIND, self.index)
    }
}

/// Dense table of records of one kind
#[derive(Debug, Clone)]
pub struct Table<R> {
    records: Vec<R>,
    by_name: AHashMap<String, usize>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_name: AHashMap::new(),
        }
    }
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record; names must be unique ignoring case
    pub fn insert(&mut self, record: R) -> Result<RecordId<R>> {
        let key = name_key(record.name());
        if key.is_empty() {
            return Err(EngineError::configuration(R::KIND, "record has an empty name"));
        }
        if self.by_name.contains_key(&key) {
            return Err(EngineError::configuration(
                format!("{} \"{}\"", R::KIND, record.name()),
                "duplicate name",
            ));
        }

        let index = self.records.len();
        self.records.push(record);
        self.by_name.insert(key, index);
        Ok(RecordId::new(index))
    }

    pub fn get(&self, id: RecordId<R>) -> Option<&R> {
        self.records.get(id.index())
    }

    pub fn get_mut(&mut self, id: RecordId<R>) -> Option<&mut R> {
        self.records.get_mut(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<RecordId<R>> {
        self.by_name.get(&name_key(name)).map(|&i| RecordId::new(i))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&R> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name_key(name))
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (RecordId<R>, &R)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RecordId::new(i), r))
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId<R>> {
        (0..self.records.len()).map(RecordId::new)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> Index<RecordId<R>> for Table<R> {
    type Output = R;

    fn index(&self, id: RecordId<R>) -> &R {
        &self.records[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named(&'static str);

    impl Record for Named {
        const KIND: &'static str = "Named";

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut table = Table::new();
        let id = table.insert(Named("Plains")).unwrap();
        assert_eq!(table.id_of("PLAINS"), Some(id));
        assert_eq!(table.find_by_name("plains").map(|r| r.0), Some("Plains"));
        assert!(table.find_by_name("forest").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut table = Table::new();
        table.insert(Named("Road")).unwrap();
        assert!(table.insert(Named("road")).is_err());
        assert!(table.insert(Named("  ")).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut table = Table::new();
        table.insert(Named("a")).unwrap();
        table.insert(Named("b")).unwrap();
        let names: Vec<_> = table.iter().map(|(_, r)| r.0).collect();
        assert_eq!(names, vec!["a", "b"]);
        let second = table.id_of("b").unwrap();
        assert_eq!(table[second].0, "b");
        assert_eq!(format!("{:?}", second), "Named#1");
    }
}
