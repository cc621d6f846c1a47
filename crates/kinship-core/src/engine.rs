//! Consistency engine
//!
//! Every mutation runs in two phases:
//! 1. **Plan**: validate the draft and stage whole-record copies of every
//!    individual the operation touches in a [`ChangeSet`]. The store is only
//!    read during this phase and planning may fail.
//! 2. **Apply**: swap the staged records into the store in one pass. This
//!    cannot fail, so readers see either the old tree or the new one.

use crate::error::{TreeError, ValidationError};
use crate::layout::Position;
use crate::lineage;
use crate::store::Store;
use crate::types::{CheckedDraft, Individual, IndividualDraft, IndividualId};
use indexmap::{IndexMap, IndexSet};

/// Staged record writes for one operation.
#[derive(Debug, Default)]
pub(crate) struct ChangeSet {
    writes: IndexMap<IndividualId, Individual>,
    deletions: Vec<IndividualId>,
}

impl ChangeSet {
    /// Number of records the change set writes or deletes.
    pub(crate) fn touched(&self) -> usize {
        self.writes.len() + self.deletions.len()
    }

    /// The tree as it would look after [`ChangeSet::apply`].
    pub(crate) fn preview<'a>(&'a self, store: &'a Store) -> impl Iterator<Item = &'a Individual> + 'a {
        let existing = store
            .all()
            .filter(|ind| !self.deletions.contains(ind.id()))
            .map(|ind| self.writes.get(ind.id()).unwrap_or(ind));
        let inserted = self.writes.values().filter(|ind| !store.contains(ind.id()));
        existing.chain(inserted)
    }

    pub(crate) fn apply(self, store: &mut Store) {
        for id in &self.deletions {
            store.delete(id);
        }
        for (_, record) in self.writes {
            if store.contains(record.id()) {
                store.replace(record);
            } else {
                store.insert(record);
            }
        }
    }
}

/// Builds a [`ChangeSet`] against a read-only store.
struct Planner<'s> {
    store: &'s Store,
    changes: ChangeSet,
}

impl<'s> Planner<'s> {
    fn new(store: &'s Store) -> Self {
        Self {
            store,
            changes: ChangeSet::default(),
        }
    }

    /// Staged copy of `id`, cloned from the store on first touch.
    fn touch(&mut self, id: &IndividualId) -> Option<&mut Individual> {
        if !self.changes.writes.contains_key(id) {
            let record = self.store.get(id)?.clone();
            self.changes.writes.insert(id.clone(), record);
        }
        self.changes.writes.get_mut(id)
    }

    /// Current view of `id`: staged copy if touched, else the stored record.
    fn view(&self, id: &IndividualId) -> Option<&Individual> {
        self.changes.writes.get(id).or_else(|| self.store.get(id))
    }

    /// Point `target.partner` at `partner`, releasing whoever `target` was
    /// partnered with before.
    fn repartner(&mut self, target: &IndividualId, partner: &IndividualId) {
        let Some(record) = self.touch(target) else {
            return;
        };
        let displaced = record.set_partner(Some(partner.clone()));
        if let Some(displaced) = displaced.filter(|d| d != partner) {
            tracing::warn!(
                individual = %target,
                displaced = %displaced,
                new_partner = %partner,
                "overwriting existing partnership"
            );
            if let Some(other) = self.touch(&displaced) {
                if other.partner() == Some(target) {
                    other.set_partner(None);
                }
            }
        }
    }

    /// Clear `target.partner` if it still points at `former`.
    fn release_partner(&mut self, target: &IndividualId, former: &IndividualId) {
        let points_back = self
            .view(target)
            .is_some_and(|record| record.partner() == Some(former));
        if points_back {
            if let Some(record) = self.touch(target) {
                record.set_partner(None);
            }
        }
    }

    fn finish(self) -> ChangeSet {
        self.changes
    }
}

/// Validate a draft for `target` (`None` when adding).
///
/// Trims nothing but the blank-name test; the stored name is kept as typed.
pub(crate) fn check_draft(
    store: &Store,
    target: Option<&IndividualId>,
    draft: IndividualDraft,
) -> Result<CheckedDraft, ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::BlankName);
    }

    let parents: IndexSet<IndividualId> = draft.parents.into_iter().collect();
    for relative in parents.iter().chain(draft.partner.iter()) {
        if Some(relative) == target {
            return Err(ValidationError::SelfReference(relative.clone()));
        }
        if !store.contains(relative) {
            return Err(ValidationError::UnknownRelative(relative.clone()));
        }
    }

    let image = draft.image.filter(|uri| !uri.trim().is_empty());

    Ok(CheckedDraft {
        name: draft.name,
        gender: draft.gender,
        description: draft.description,
        image,
        parents,
        partner: draft.partner,
    })
}

/// Plan insertion of a new individual with a fresh `id`.
pub(crate) fn plan_add(
    store: &Store,
    id: IndividualId,
    draft: CheckedDraft,
    position: Position,
) -> ChangeSet {
    let mut planner = Planner::new(store);

    for parent in &draft.parents {
        if let Some(record) = planner.touch(parent) {
            record.link_child(&id);
        }
    }
    if let Some(partner) = &draft.partner {
        planner.repartner(partner, &id);
    }

    let record = Individual::new(id.clone(), draft, position);
    let mut changes = planner.finish();
    changes.writes.insert(id, record);
    changes
}

/// Plan an edit of `id`.
pub(crate) fn plan_update(
    store: &Store,
    id: &IndividualId,
    draft: CheckedDraft,
    reject_cycles: bool,
) -> Result<ChangeSet, TreeError> {
    let current = store
        .get(id)
        .ok_or_else(|| TreeError::NotFound(id.clone()))?;
    let mut planner = Planner::new(store);

    if current.partner() != draft.partner.as_ref() {
        if let Some(old) = current.partner() {
            planner.release_partner(old, id);
        }
        if let Some(new) = &draft.partner {
            planner.repartner(new, id);
        }
    }

    for dropped in current.parents().difference(&draft.parents) {
        if let Some(record) = planner.touch(dropped) {
            record.unlink_child(id);
        }
    }
    for added in draft.parents.difference(current.parents()) {
        if let Some(record) = planner.touch(added) {
            record.link_child(id);
        }
    }

    if let Some(record) = planner.touch(id) {
        record.apply_draft(draft);
    }
    let changes = planner.finish();

    if reject_cycles && lineage::has_cycle(changes.preview(store)) {
        return Err(ValidationError::LineageCycle(id.clone()).into());
    }
    Ok(changes)
}

/// Plan deletion of `id` and scrub every reference to it.
pub(crate) fn plan_remove(store: &Store, id: &IndividualId) -> Result<ChangeSet, TreeError> {
    if !store.contains(id) {
        return Err(TreeError::NotFound(id.clone()));
    }
    let mut planner = Planner::new(store);

    for other in store.all().filter(|ind| ind.id() != id) {
        let refers = other.children().contains(id)
            || other.parents().contains(id)
            || other.partner() == Some(id);
        if !refers {
            continue;
        }
        let other_id = other.id().clone();
        if let Some(record) = planner.touch(&other_id) {
            record.unlink_child(id);
            record.unlink_parent(id);
            if record.partner() == Some(id) {
                record.set_partner(None);
            }
        }
    }

    let mut changes = planner.finish();
    changes.deletions.push(id.clone());
    Ok(changes)
}
