//! Tree tests - end-to-end editing through the public handle

use kinship_core::lineage::is_ancestor;
use kinship_core::*;
use kinship_test_utils::{alice_bob_carol, assert_consistent, ids, individual, lineage, seeded_tree};
use pretty_assertions::assert_eq;

fn count(edges: &[Connection], kind: ConnectionKind) -> usize {
    edges.iter().filter(|e| e.kind == kind).count()
}

#[test]
fn test_alice_bob_carol_lifecycle() {
    let mut tree = seeded_tree();

    let alice = tree.add(IndividualDraft::named("Alice")).unwrap();
    assert_eq!(tree.len(), 1);
    assert!(tree.edges().is_empty());

    let bob = tree
        .add(IndividualDraft::named("Bob").with_partner(alice.clone()))
        .unwrap();
    assert_eq!(individual(&tree, &alice).partner(), Some(&bob));
    assert_eq!(individual(&tree, &bob).partner(), Some(&alice));
    let edges = tree.edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(count(&edges, ConnectionKind::Partnership), 1);

    let carol = tree
        .add(IndividualDraft::named("Carol").with_parents([alice.clone(), bob.clone()]))
        .unwrap();
    assert!(individual(&tree, &alice).children().contains(&carol));
    assert!(individual(&tree, &bob).children().contains(&carol));
    let edges = tree.edges();
    assert_eq!(count(&edges, ConnectionKind::ParentChild), 2);
    assert_eq!(count(&edges, ConnectionKind::Partnership), 1);

    let removed = tree.remove(&bob).unwrap();
    assert_eq!(removed.name(), "Bob");
    assert_eq!(individual(&tree, &alice).partner(), None);
    assert_eq!(ids(individual(&tree, &carol).parents()), vec![alice.as_str()]);
    let edges = tree.edges();
    assert_eq!(count(&edges, ConnectionKind::Partnership), 0);
    assert_eq!(count(&edges, ConnectionKind::ParentChild), 1);
    assert_consistent(&tree);
}

#[test]
fn test_setting_and_clearing_partner_is_mirrored() {
    let mut tree = seeded_tree();
    let a = tree.add(IndividualDraft::named("A")).unwrap();
    let b = tree.add(IndividualDraft::named("B")).unwrap();

    let draft = IndividualDraft::from_individual(individual(&tree, &a)).with_partner(b.clone());
    tree.update(&a, draft).unwrap();
    assert_eq!(individual(&tree, &b).partner(), Some(&a));

    let draft = IndividualDraft::from_individual(individual(&tree, &a)).without_partner();
    tree.update(&a, draft).unwrap();
    assert_eq!(individual(&tree, &b).partner(), None);
    assert_consistent(&tree);
}

#[test]
fn test_switching_partner_releases_the_old_one() {
    let (mut tree, family) = alice_bob_carol();
    let dave = tree.add(IndividualDraft::named("Dave")).unwrap();

    let draft = IndividualDraft::from_individual(individual(&tree, &family.alice)).with_partner(dave.clone());
    tree.update(&family.alice, draft).unwrap();

    assert_eq!(individual(&tree, &family.alice).partner(), Some(&dave));
    assert_eq!(individual(&tree, &dave).partner(), Some(&family.alice));
    assert_eq!(individual(&tree, &family.bob).partner(), None);
    assert_consistent(&tree);
}

#[test]
fn test_partnering_with_a_partnered_individual_overwrites() {
    let (mut tree, family) = alice_bob_carol();

    // Dave claims Bob; Alice loses her partner rather than the add failing.
    let dave = tree
        .add(IndividualDraft::named("Dave").with_partner(family.bob.clone()))
        .unwrap();

    assert_eq!(individual(&tree, &family.bob).partner(), Some(&dave));
    assert_eq!(individual(&tree, &family.alice).partner(), None);
    assert_eq!(count(&tree.edges(), ConnectionKind::Partnership), 1);
    assert_consistent(&tree);
}

#[test]
fn test_update_rewires_only_changed_parents() {
    let (mut tree, family) = alice_bob_carol();
    let dave = tree.add(IndividualDraft::named("Dave")).unwrap();

    let draft = IndividualDraft::from_individual(individual(&tree, &family.carol))
        .with_parents([family.alice.clone(), dave.clone()]);
    tree.update(&family.carol, draft).unwrap();

    assert!(individual(&tree, &family.alice).children().contains(&family.carol));
    assert!(!individual(&tree, &family.bob).children().contains(&family.carol));
    assert!(individual(&tree, &dave).children().contains(&family.carol));
    assert_eq!(
        ids(individual(&tree, &family.carol).parents()),
        vec![family.alice.as_str(), dave.as_str()]
    );
    assert_consistent(&tree);
}

#[test]
fn test_update_keeps_children_and_position() {
    let (mut tree, family) = alice_bob_carol();
    let before = individual(&tree, &family.alice).clone();

    let draft = IndividualDraft::from_individual(&before)
        .with_description("Matriarch")
        .with_gender(Gender::Female)
        .with_image("https://example.org/alice.png");
    tree.update(&family.alice, draft).unwrap();

    let after = individual(&tree, &family.alice);
    assert_eq!(after.description(), "Matriarch");
    assert_eq!(after.gender(), Gender::Female);
    assert_eq!(after.image(), Some("https://example.org/alice.png"));
    assert_eq!(after.children(), before.children());
    assert_eq!(after.position(), before.position());
}

#[test]
fn test_removal_scrubs_every_reference() {
    let (mut tree, ids) = lineage(5);
    let middle = ids[2].clone();
    tree.remove(&middle).unwrap();

    for record in tree.all() {
        assert!(!record.parents().contains(&middle));
        assert!(!record.children().contains(&middle));
        assert_ne!(record.partner(), Some(&middle));
    }
    assert!(tree.get(&middle).is_none());
    assert_consistent(&tree);
}

#[test]
fn test_partnership_edge_emitted_once() {
    let mut tree = seeded_tree();
    // ids "9" and "10" sort differently as strings and numbers
    tree.import(
        r#"[
        {"id":"10","name":"Ten","partner":"9","position":{"x":0,"y":0}},
        {"id":"9","name":"Nine","partner":"10","position":{"x":5,"y":5}}
    ]"#,
    )
    .unwrap();

    let edges = tree.edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].kind, ConnectionKind::Partnership);
    assert_eq!(edges[0].key, "10-9");
}

#[test]
fn test_edges_follow_moves() {
    let (mut tree, family) = alice_bob_carol();
    tree.set_position(&family.carol, Position::new(42.0, 84.0)).unwrap();

    let line = tree
        .edges()
        .into_iter()
        .find(|e| e.key == format!("{}-{}", family.alice, family.carol))
        .unwrap();
    assert_eq!(line.to, Position::new(42.0, 84.0));
}

#[test]
fn test_relatives_of_child() {
    let (tree, family) = alice_bob_carol();
    let rel = tree.relatives(&family.carol).unwrap();
    assert!(rel.partner.is_none());
    assert_eq!(
        rel.parents.iter().map(|p| p.name()).collect::<Vec<_>>(),
        vec!["Alice", "Bob"]
    );
    assert!(rel.children.is_empty());
}

#[test]
fn test_cycles_allowed_by_default() {
    let (mut tree, ids) = lineage(3);
    let draft = IndividualDraft::from_individual(individual(&tree, &ids[0])).with_parents([ids[2].clone()]);
    tree.update(&ids[0], draft).unwrap();
    assert!(!is_ancestor(tree.store(), ids[0].as_str(), ids[0].as_str()));
    assert!(is_ancestor(tree.store(), ids[2].as_str(), ids[1].as_str()));
    assert_consistent(&tree);
}

#[test]
fn test_cycles_rejected_when_configured() {
    let mut tree = FamilyTree::with_config(TreeConfig::default().with_seed(1).rejecting_lineage_cycles());
    let grandparent = tree.add(IndividualDraft::named("G")).unwrap();
    let parent = tree
        .add(IndividualDraft::named("P").with_parents([grandparent.clone()]))
        .unwrap();
    let child = tree
        .add(IndividualDraft::named("C").with_parents([parent.clone()]))
        .unwrap();
    let before = tree.snapshot();

    let draft = IndividualDraft::from_individual(individual(&tree, &grandparent)).with_parents([child.clone()]);
    let err = tree.update(&grandparent, draft).unwrap_err();

    assert_eq!(err, TreeError::Validation(ValidationError::LineageCycle(grandparent)));
    assert_eq!(tree.snapshot(), before);
}

#[test]
fn test_uuid_ids_are_distinct() {
    let mut tree = FamilyTree::with_config(TreeConfig::default().with_id_strategy(IdStrategy::Uuid));
    let a = tree.add(IndividualDraft::named("A")).unwrap();
    let b = tree.add(IndividualDraft::named("B")).unwrap();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
}

#[test]
fn test_ids_are_never_reused_after_removal() {
    let mut tree = seeded_tree();
    let a = tree.add(IndividualDraft::named("A")).unwrap();
    tree.remove(&a).unwrap();
    let b = tree.add(IndividualDraft::named("B")).unwrap();
    assert_ne!(a, b);
}
