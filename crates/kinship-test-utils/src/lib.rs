//! Testing utilities for the Kinship workspace
//!
//! Shared fixtures and assertions.

#![allow(missing_docs)]

use kinship_core::{FamilyTree, Individual, IndividualDraft, IndividualId, TreeConfig};

/// Seed used by every fixture tree so placements are reproducible.
pub const FIXTURE_SEED: u64 = 7;

pub fn seeded_tree() -> FamilyTree {
    FamilyTree::with_config(TreeConfig::default().with_seed(FIXTURE_SEED))
}

/// Ids of the three-person fixture family.
#[derive(Debug, Clone)]
pub struct Family {
    pub alice: IndividualId,
    pub bob: IndividualId,
    pub carol: IndividualId,
}

/// Alice and Bob are partners; Carol is their child.
pub fn alice_bob_carol() -> (FamilyTree, Family) {
    let mut tree = seeded_tree();
    let alice = tree.add(IndividualDraft::named("Alice")).unwrap();
    let bob = tree
        .add(IndividualDraft::named("Bob").with_partner(alice.clone()))
        .unwrap();
    let carol = tree
        .add(IndividualDraft::named("Carol").with_parents([alice.clone(), bob.clone()]))
        .unwrap();
    (tree, Family { alice, bob, carol })
}

/// A straight line of `depth` generations, oldest first.
pub fn lineage(depth: usize) -> (FamilyTree, Vec<IndividualId>) {
    let mut tree = seeded_tree();
    let mut ids: Vec<IndividualId> = Vec::with_capacity(depth);
    for generation in 0..depth {
        let mut draft = IndividualDraft::named(format!("Generation {generation}"));
        if let Some(parent) = ids.last() {
            draft = draft.with_parents([parent.clone()]);
        }
        ids.push(tree.add(draft).unwrap());
    }
    (tree, ids)
}

pub fn individual<'a>(tree: &'a FamilyTree, id: &IndividualId) -> &'a Individual {
    tree.get(id)
        .unwrap_or_else(|| panic!("individual {id} missing from tree"))
}

/// Panics with every violation listed if the tree is inconsistent.
pub fn assert_consistent(tree: &FamilyTree) {
    let violations = tree.check_invariants();
    assert!(
        violations.is_empty(),
        "tree is inconsistent:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Ids as plain strings, for compact assertions.
pub fn ids<'a>(ids: impl IntoIterator<Item = &'a IndividualId>) -> Vec<&'a str> {
    ids.into_iter().map(IndividualId::as_str).collect()
}
