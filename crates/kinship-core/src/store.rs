//! Relationship graph store.
//!
//! An insertion-ordered map from id to [`Individual`]. The order exists only
//! so that listings and renders are stable between calls. Writes are
//! crate-private: every mutation goes through the engine.

use crate::error::FormatError;
use crate::types::{Individual, IndividualId};
use indexmap::{Equivalent, IndexMap};
use std::hash::Hash;

/// Individuals keyed by id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    individuals: IndexMap<IndividualId, Individual>,
}

impl Store {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from decoded records, rejecting duplicate ids, blank
    /// names and non-finite positions. Edge consistency is checked separately.
    pub(crate) fn from_records(records: Vec<Individual>) -> Result<Self, FormatError> {
        let mut individuals = IndexMap::with_capacity(records.len());
        for record in records {
            if record.name().trim().is_empty() {
                return Err(FormatError::BlankName(record.id().clone()));
            }
            if !record.position().is_finite() {
                return Err(FormatError::NonFinitePosition(record.id().clone()));
            }
            let id = record.id().clone();
            if individuals.insert(id.clone(), record).is_some() {
                return Err(FormatError::DuplicateId(id));
            }
        }
        Ok(Self { individuals })
    }

    /// Look up one individual.
    pub fn get<Q>(&self, id: &Q) -> Option<&Individual>
    where
        Q: ?Sized + Hash + Equivalent<IndividualId>,
    {
        self.individuals.get(id)
    }

    /// Whether `id` is present.
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<IndividualId>,
    {
        self.individuals.contains_key(id)
    }

    /// All individuals in insertion order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &Individual> + '_ {
        self.individuals.values()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &IndividualId> + '_ {
        self.individuals.keys()
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// No individuals yet.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Clone of every record, for snapshots.
    pub fn to_vec(&self) -> Vec<Individual> {
        self.individuals.values().cloned().collect()
    }

    /// Appends a new record; an existing id keeps its slot.
    pub(crate) fn insert(&mut self, individual: Individual) {
        self.individuals.insert(individual.id().clone(), individual);
    }

    pub(crate) fn replace(&mut self, individual: Individual) -> Option<Individual> {
        let slot = self.individuals.get_mut(individual.id())?;
        Some(std::mem::replace(slot, individual))
    }

    pub(crate) fn delete(&mut self, id: &IndividualId) -> Option<Individual> {
        self.individuals.shift_remove(id)
    }

    pub(crate) fn get_mut(&mut self, id: &IndividualId) -> Option<&mut Individual> {
        self.individuals.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> Individual {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "position": { "x": 0.0, "y": 0.0 }
        }))
        .unwrap()
    }

    #[test]
    fn keeps_insertion_order_after_delete() {
        let mut store = Store::new();
        store.insert(record("b", "B"));
        store.insert(record("a", "A"));
        store.insert(record("c", "C"));
        store.delete(&IndividualId::from("a"));

        let ids: Vec<_> = store.ids().map(IndividualId::as_str).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn lookup_accepts_str_and_id() {
        let mut store = Store::new();
        store.insert(record("7", "Seven"));
        assert!(store.get("7").is_some());
        assert!(store.get(&IndividualId::from("7")).is_some());
        assert!(!store.contains("8"));
    }

    #[test]
    fn replace_requires_existing_record() {
        let mut store = Store::new();
        assert!(store.replace(record("1", "One")).is_none());
        assert!(store.is_empty());

        store.insert(record("1", "One"));
        let old = store.replace(record("1", "Uno")).unwrap();
        assert_eq!(old.name(), "One");
        assert_eq!(store.get("1").unwrap().name(), "Uno");
    }

    #[test]
    fn from_records_rejects_duplicates_and_blank_names() {
        let dup = Store::from_records(vec![record("1", "A"), record("1", "B")]);
        assert_eq!(dup, Err(FormatError::DuplicateId(IndividualId::from("1"))));

        let blank = Store::from_records(vec![record("2", "  ")]);
        assert_eq!(blank, Err(FormatError::BlankName(IndividualId::from("2"))));
    }

    #[test]
    fn from_records_rejects_non_finite_positions() {
        let mut bad = record("3", "Drifter");
        bad.set_position(crate::layout::Position::new(f64::INFINITY, 0.0));
        let result = Store::from_records(vec![record("1", "A"), bad]);
        assert_eq!(result, Err(FormatError::NonFinitePosition(IndividualId::from("3"))));
    }
}
