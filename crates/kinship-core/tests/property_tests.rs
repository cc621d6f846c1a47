//! Property tests - arbitrary edit sequences keep every edge mirrored

use kinship_core::*;
use kinship_test_utils::{assert_consistent, seeded_tree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Add { parents: Vec<usize>, partner: Option<usize> },
    Update { target: usize, parents: Vec<usize>, partner: Option<usize> },
    Remove { target: usize },
    Move { target: usize, x: f64, y: f64 },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    let slot = 0usize..16;
    let parents = prop::collection::vec(0usize..16, 0..3);
    prop_oneof![
        4 => (parents.clone(), prop::option::of(slot.clone()))
            .prop_map(|(parents, partner)| Edit::Add { parents, partner }),
        3 => (slot.clone(), parents, prop::option::of(slot.clone()))
            .prop_map(|(target, parents, partner)| Edit::Update { target, parents, partner }),
        1 => slot.clone().prop_map(|target| Edit::Remove { target }),
        1 => (slot, -500.0f64..500.0, -500.0f64..500.0)
            .prop_map(|(target, x, y)| Edit::Move { target, x, y }),
    ]
}

/// Resolve slot numbers against the current population; out-of-range
/// slots wrap so most edits touch real individuals.
fn resolve(tree: &FamilyTree, slot: usize) -> Option<IndividualId> {
    let ids: Vec<&IndividualId> = tree.all().map(Individual::id).collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids[slot % ids.len()].clone())
    }
}

fn draft_for(tree: &FamilyTree, name: String, parents: &[usize], partner: Option<usize>) -> IndividualDraft {
    let parents: Vec<IndividualId> = parents.iter().filter_map(|&s| resolve(tree, s)).collect();
    let mut draft = IndividualDraft::named(name).with_parents(parents);
    if let Some(partner) = partner.and_then(|s| resolve(tree, s)) {
        draft = draft.with_partner(partner);
    }
    draft
}

fn run(tree: &mut FamilyTree, edit: &Edit, step: usize) {
    match edit {
        Edit::Add { parents, partner } => {
            let draft = draft_for(tree, format!("P{step}"), parents, *partner);
            tree.add(draft).unwrap();
        }
        Edit::Update { target, parents, partner } => {
            if let Some(id) = resolve(tree, *target) {
                let draft = draft_for(tree, format!("U{step}"), parents, *partner);
                // drafts naming the target itself are rejected; the tree must not change
                let before = tree.snapshot();
                if tree.update(&id, draft).is_err() {
                    assert_eq!(tree.snapshot(), before);
                }
            }
        }
        Edit::Remove { target } => {
            if let Some(id) = resolve(tree, *target) {
                tree.remove(&id).unwrap();
            }
        }
        Edit::Move { target, x, y } => {
            if let Some(id) = resolve(tree, *target) {
                tree.set_position(&id, Position::new(*x, *y)).unwrap();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn edits_preserve_invariants(edits in prop::collection::vec(edit_strategy(), 1..60)) {
        let mut tree = seeded_tree();
        for (step, edit) in edits.iter().enumerate() {
            run(&mut tree, edit, step);
            prop_assert!(tree.check_invariants().is_empty());
        }
        assert_consistent(&tree);
    }

    #[test]
    fn export_import_round_trips(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut tree = seeded_tree();
        for (step, edit) in edits.iter().enumerate() {
            run(&mut tree, edit, step);
        }
        let text = tree.export().unwrap();
        let mut copy = FamilyTree::new();
        copy.import(&text).unwrap();
        prop_assert_eq!(copy.snapshot(), tree.snapshot());
    }

    #[test]
    fn partnership_edges_are_never_duplicated(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut tree = seeded_tree();
        for (step, edit) in edits.iter().enumerate() {
            run(&mut tree, edit, step);
        }
        let partnered = tree.all().filter(|i| i.partner().is_some()).count();
        let lines = tree
            .edges()
            .iter()
            .filter(|e| e.kind == ConnectionKind::Partnership)
            .count();
        prop_assert_eq!(lines * 2, partnered);
    }
}
