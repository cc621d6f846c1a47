//! The family tree handle: queries plus validated, all-or-nothing edits.

use crate::config::TreeConfig;
use crate::edges::{self, Connection};
use crate::engine;
use crate::error::{FormatError, TreeError, TreeResult, ValidationError};
use crate::ids::IdAllocator;
use crate::invariants::{self, InvariantViolation};
use crate::layout::Position;
use crate::lineage;
use crate::snapshot;
use crate::store::Store;
use crate::types::{Individual, IndividualDraft, IndividualId};
use indexmap::{Equivalent, IndexSet};
use rand::{rngs::StdRng, SeedableRng};
use std::hash::Hash;

/// Resolved relatives of one individual, for a details view.
#[derive(Debug, Clone, PartialEq)]
pub struct Relatives<'a> {
    /// Partner, if set and still present.
    pub partner: Option<&'a Individual>,
    /// Parents still present in the tree.
    pub parents: Vec<&'a Individual>,
    /// Children still present in the tree.
    pub children: Vec<&'a Individual>,
}

/// Main handle over a family tree.
///
/// Reads are plain borrows of the store. Writes go through the engine and
/// are applied whole or not at all.
#[derive(Debug)]
pub struct FamilyTree {
    config: TreeConfig,
    store: Store,
    ids: Box<dyn IdAllocator>,
    rng: StdRng,
}

impl FamilyTree {
    /// Create an empty tree with default configuration
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree with custom configuration
    pub fn with_config(config: TreeConfig) -> Self {
        let ids = config.id_strategy.allocator();
        Self::with_allocator(config, ids)
    }

    /// Create an empty tree with an explicit id allocator
    pub fn with_allocator(config: TreeConfig, ids: Box<dyn IdAllocator>) -> Self {
        let rng = config
            .placement_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            config,
            store: Store::new(),
            ids,
            rng,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Read-only view of the records.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Look up one individual.
    pub fn get<Q>(&self, id: &Q) -> Option<&Individual>
    where
        Q: ?Sized + Hash + Equivalent<IndividualId>,
    {
        self.store.get(id)
    }

    /// All individuals in insertion order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &Individual> + '_ {
        self.store.all()
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// No individuals yet.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Lines to draw, derived from the current records.
    pub fn edges(&self) -> Vec<Connection> {
        edges::project(&self.store)
    }

    /// Partner, parents and children of `id`. Stale ids are skipped.
    pub fn relatives(&self, id: &IndividualId) -> TreeResult<Relatives<'_>> {
        let individual = self
            .store
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        Ok(Relatives {
            partner: individual.partner().and_then(|p| self.store.get(p)),
            parents: self.resolve(individual.parents()),
            children: self.resolve(individual.children()),
        })
    }

    fn resolve<'a>(&'a self, ids: &IndexSet<IndividualId>) -> Vec<&'a Individual> {
        ids.iter().filter_map(|id| self.store.get(id)).collect()
    }

    /// Every structural problem in the store; empty when consistent.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        invariants::check(&self.store)
    }

    /// Add a new individual and link it to its parents and partner.
    pub fn add(&mut self, draft: IndividualDraft) -> TreeResult<IndividualId> {
        let checked = engine::check_draft(&self.store, None, draft).map_err(|e| {
            tracing::warn!(error = %e, "rejected add");
            TreeError::from(e)
        })?;

        let position = self.config.canvas.random_point(&mut self.rng);
        if !position.is_finite() {
            tracing::warn!(canvas = ?self.config.canvas, "canvas region is not finite");
            return Err(ValidationError::NonFiniteCanvas.into());
        }
        let id = self.allocate_id();
        let changes = engine::plan_add(&self.store, id.clone(), checked, position);
        tracing::debug!(individual = %id, touched = changes.touched(), "add");
        changes.apply(&mut self.store);
        Ok(id)
    }

    /// Replace the fields of `id` and rewire the edges that changed.
    pub fn update(&mut self, id: &IndividualId, draft: IndividualDraft) -> TreeResult<()> {
        if !self.store.contains(id) {
            return Err(TreeError::NotFound(id.clone()));
        }
        let result = engine::check_draft(&self.store, Some(id), draft)
            .map_err(TreeError::from)
            .and_then(|checked| {
                engine::plan_update(&self.store, id, checked, self.config.reject_lineage_cycles)
            });
        let changes = result.map_err(|e| {
            tracing::warn!(individual = %id, error = %e, "rejected update");
            e
        })?;
        tracing::debug!(individual = %id, touched = changes.touched(), "update");
        changes.apply(&mut self.store);
        Ok(())
    }

    /// Remove `id` and every reference to it. Returns the removed record.
    pub fn remove(&mut self, id: &IndividualId) -> TreeResult<Individual> {
        let changes = engine::plan_remove(&self.store, id)?;
        let removed = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        tracing::debug!(individual = %id, touched = changes.touched(), "remove");
        changes.apply(&mut self.store);
        Ok(removed)
    }

    /// Move `id` on the canvas. No relationship state is involved.
    ///
    /// NaN and infinite coordinates are rejected so the tree always exports.
    pub fn set_position(&mut self, id: &IndividualId, position: Position) -> TreeResult<()> {
        let record = self
            .store
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        if !position.is_finite() {
            tracing::warn!(individual = %id, ?position, "rejected move");
            return Err(ValidationError::NonFinitePosition(id.clone()).into());
        }
        record.set_position(position);
        Ok(())
    }

    /// All records, in store order.
    pub fn snapshot(&self) -> Vec<Individual> {
        self.store.to_vec()
    }

    /// The whole tree as snapshot text.
    pub fn export(&self) -> Result<String, FormatError> {
        snapshot::serialize(&self.snapshot())
    }

    /// Replace the whole tree with the decoded snapshot text.
    ///
    /// On any error the current tree is left untouched.
    pub fn import(&mut self, text: &str) -> TreeResult<usize> {
        let records = snapshot::deserialize(text).map_err(|e| {
            tracing::warn!(error = %e, "rejected import");
            TreeError::from(e)
        })?;
        Ok(self.replace_all(records)?)
    }

    /// Replace the whole tree with already-decoded records after checking
    /// them for duplicates, blank names and edge consistency.
    pub fn replace_all(&mut self, records: Vec<Individual>) -> Result<usize, FormatError> {
        let store = Store::from_records(records)?;
        let violations = invariants::check(&store);
        if let Some(first) = violations.first() {
            tracing::warn!(problems = violations.len(), first = %first, "rejected import");
            return Err(FormatError::Inconsistent {
                count: violations.len(),
                first: first.to_string(),
            });
        }
        if self.config.reject_lineage_cycles && lineage::has_cycle(store.all()) {
            tracing::warn!("rejected import with lineage cycle");
            return Err(FormatError::Inconsistent {
                count: 1,
                first: "someone is their own ancestor".to_string(),
            });
        }

        for id in store.ids() {
            self.ids.observe(id);
        }
        let count = store.len();
        self.store = store;
        tracing::info!(individuals = count, "imported snapshot");
        Ok(count)
    }

    fn allocate_id(&mut self) -> IndividualId {
        loop {
            let id = self.ids.next_id();
            if !self.store.contains(&id) {
                return id;
            }
            self.ids.observe(&id);
        }
    }
}

impl Default for FamilyTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn seeded() -> FamilyTree {
        FamilyTree::with_config(TreeConfig::default().with_seed(11))
    }

    #[test]
    fn add_places_individual_in_default_region() {
        let mut tree = seeded();
        let id = tree.add(IndividualDraft::named("Alice")).unwrap();
        let alice = tree.get(&id).unwrap();
        assert!(tree.config().canvas.contains(alice.position()));
        assert!(alice.children().is_empty());
    }

    #[test]
    fn blank_add_is_a_no_op() {
        let mut tree = seeded();
        let err = tree.add(IndividualDraft::named(" \t")).unwrap_err();
        assert_eq!(err, TreeError::Validation(ValidationError::BlankName));
        assert!(tree.is_empty());
        // the rejected add did not burn an id
        assert_eq!(tree.add(IndividualDraft::named("A")).unwrap().as_str(), "1");
    }

    #[test]
    fn allocator_skips_ids_already_present() {
        let mut tree = FamilyTree::with_allocator(TreeConfig::default(), Box::new(SequentialIds::new()));
        tree.import(r#"[{"id":"1","name":"Old","position":{"x":0,"y":0}}]"#).unwrap();
        let id = tree.add(IndividualDraft::named("New")).unwrap();
        assert_eq!(id.as_str(), "2");
    }

    #[test]
    fn set_position_only_moves() {
        let mut tree = seeded();
        let id = tree.add(IndividualDraft::named("A")).unwrap();
        tree.set_position(&id, Position::new(3.0, 4.0)).unwrap();
        assert_eq!(tree.get(&id).unwrap().position(), Position::new(3.0, 4.0));

        let missing = tree.set_position(&"nope".into(), Position::default());
        assert_eq!(missing, Err(TreeError::NotFound("nope".into())));
    }

    #[test]
    fn infinite_canvas_rejects_add_without_using_an_id() {
        let mut config = TreeConfig::default().with_seed(2);
        config.canvas.width = f64::INFINITY;
        let mut tree = FamilyTree::with_config(config);

        let err = tree.add(IndividualDraft::named("A")).unwrap_err();
        assert_eq!(err, TreeError::Validation(ValidationError::NonFiniteCanvas));
        assert!(tree.is_empty());

        tree.config.canvas = crate::layout::CanvasRegion::default();
        assert_eq!(tree.add(IndividualDraft::named("A")).unwrap().as_str(), "1");
    }

    #[test]
    fn relatives_resolve_names() {
        let mut tree = seeded();
        let a = tree.add(IndividualDraft::named("A")).unwrap();
        let b = tree.add(IndividualDraft::named("B").with_partner(a.clone())).unwrap();
        let c = tree
            .add(IndividualDraft::named("C").with_parents([a.clone(), b.clone()]))
            .unwrap();

        let rel = tree.relatives(&a).unwrap();
        assert_eq!(rel.partner.map(Individual::name), Some("B"));
        assert!(rel.parents.is_empty());
        assert_eq!(rel.children.iter().map(|i| i.id()).collect::<Vec<_>>(), vec![&c]);
    }

    #[test]
    fn update_of_missing_id_is_not_found() {
        let mut tree = seeded();
        let err = tree.update(&"9".into(), IndividualDraft::named("X")).unwrap_err();
        assert_eq!(err, TreeError::NotFound("9".into()));
    }
}
