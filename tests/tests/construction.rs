//! Construction guard and post-construction fix-up.

mod common;

use pretty_assertions::assert_eq;
use relink_session::construction_depth;
use relink_tests::prelude::*;
use std::collections::BTreeSet;

/// Snapshot of the family relationship state, for comparing two graphs.
fn family_state(
    session: &mut Session<'_>,
    parent: EntityId,
    children: &[EntityId],
) -> (BTreeSet<EntityId>, Vec<Option<EntityId>>, Vec<BTreeSet<String>>) {
    let members = session.collection(parent, "children").unwrap();
    let refs = children
        .iter()
        .map(|c| session.ref_field(*c, "parent").unwrap())
        .collect();
    let changes = std::iter::once(parent)
        .chain(children.iter().copied())
        .map(|id| session.graph().changed_fields(id).unwrap().clone())
        .collect();
    (members, refs, changes)
}

#[test]
fn test_raw_children_fixup_matches_add_path() {
    common::init_tracing();
    let registry = fixtures::registry(fixtures::family()).unwrap();

    // GIVEN a parent constructed with children = {c1, c2}
    let mut built = Session::new(&registry);
    let c1 = built.create("Child").unwrap();
    let c2 = built.create("Child").unwrap();
    let parent = built
        .construct("Parent", |s, id| s.assign_collection(id, "children", [c1, c2]))
        .unwrap();

    // AND an empty parent given the same children through add
    let mut added = Session::new(&registry);
    let d1 = added.create("Child").unwrap();
    let d2 = added.create("Child").unwrap();
    let other = added.create("Parent").unwrap();
    added.collection_mutator(other, "children").unwrap().add(d1).unwrap();
    added.collection_mutator(other, "children").unwrap().add(d2).unwrap();

    // THEN both graphs hold the same relationships and change marks
    assert_eq!((c1, c2, parent), (d1, d2, other));
    assert_eq!(
        family_state(&mut built, parent, &[c1, c2]),
        family_state(&mut added, other, &[d1, d2])
    );
}

#[test]
fn test_writes_inside_constructor_are_raw() {
    let registry = fixtures::registry(fixtures::family()).unwrap();
    let mut session = Session::new(&registry);
    let parent = session.create("Parent").unwrap();
    let mut seen_inside = None;

    let child = session
        .construct("Child", |s, id| {
            s.assign_ref(id, "parent", Some(parent))?;
            // Not linked yet: the fix-up runs after the constructor
            seen_inside = Some(s.graph().collection(parent, "children")?.cloned());
            Ok(())
        })
        .unwrap();

    assert_eq!(seen_inside, Some(Some(BTreeSet::new())));
    assert_eq!(
        session.collection(parent, "children").unwrap(),
        BTreeSet::from([child])
    );
    assert!(session.graph().changed_fields(child).unwrap().is_empty());
}

#[test]
fn test_nested_construction_restores_guard() {
    let registry = fixtures::registry(fixtures::family()).unwrap();
    let mut session = Session::new(&registry);
    let mut child = None;

    // GIVEN a parent whose constructor builds its own child
    let parent = session
        .construct("Parent", |s, p| {
            assert_eq!(construction_depth(), 1);
            let c = s.construct("Child", |s, c| {
                assert_eq!(construction_depth(), 2);
                s.assign_ref(c, "parent", Some(p))
            })?;
            assert_eq!(construction_depth(), 1);
            child = Some(c);
            Ok(())
        })
        .unwrap();
    let child = child.unwrap();

    // THEN the guard is back at zero and the pair is consistent
    assert_eq!(construction_depth(), 0);
    assert_eq!(session.ref_field(child, "parent").unwrap(), Some(parent));
    assert_eq!(
        session.collection(parent, "children").unwrap(),
        BTreeSet::from([child])
    );

    // WHEN the field is assigned afterwards, it goes through the mutator
    session.assign_ref(child, "parent", None).unwrap();
    assert!(session.collection(parent, "children").unwrap().is_empty());
}

#[test]
fn test_failed_constructor_leaves_no_entity() {
    let registry = fixtures::registry(fixtures::family()).unwrap();
    let mut session = Session::new(&registry);

    let result = session.construct("Child", |s, id| s.assign_collection(id, "parent", Vec::new()));

    assert!(matches!(
        result,
        Err(MutationError::MutatorKindMismatch { .. })
    ));
    assert!(session.graph().is_empty());
    assert_eq!(construction_depth(), 0);
}

#[test]
fn test_fixup_reports_conflicting_raw_children() {
    // GIVEN c already belongs to p1, and free has no parent
    let registry = fixtures::registry(fixtures::family()).unwrap();
    let mut session = Session::new(&registry);
    let p1 = session.create("Parent").unwrap();
    let c = session.create("Child").unwrap();
    let free = session.create("Child").unwrap();
    session.collection_mutator(p1, "children").unwrap().add(c).unwrap();

    // WHEN p2 is constructed with {c, free}
    let result = session.construct("Parent", |s, id| s.assign_collection(id, "children", [c, free]));

    // THEN the fix-up refuses and links nothing
    assert!(matches!(
        result,
        Err(MutationError::AlreadyAssociated { .. })
    ));
    assert_eq!(session.ref_field(c, "parent").unwrap(), Some(p1));
    assert_eq!(session.ref_field(free, "parent").unwrap(), None);

    // AND p2 keeps what its constructor wrote
    let p2 = session
        .graph()
        .entities_of_type("Parent")
        .find(|id| *id != p1)
        .unwrap();
    assert_eq!(
        session.collection(p2, "children").unwrap(),
        BTreeSet::from([c, free])
    );
}

#[test]
fn test_failed_constructor_scrubs_raw_references() {
    // GIVEN a parent whose children are about to be set
    let registry = fixtures::registry(fixtures::family()).unwrap();
    let mut session = Session::new(&registry);
    let parent = session.create("Parent").unwrap();
    let c = session.create("Child").unwrap();

    // WHEN a child constructor writes itself into the parent, then fails
    let result = session.construct("Child", |s, id| {
        s.assign_collection(parent, "children", [id])?;
        s.assign_collection(id, "parent", Vec::new())
    });

    // THEN no dangling id is left and the parent stays usable
    assert!(result.is_err());
    assert!(session.collection(parent, "children").unwrap().is_empty());
    session
        .collection_mutator(parent, "children")
        .unwrap()
        .set([c])
        .unwrap();
    assert_eq!(session.ref_field(c, "parent").unwrap(), Some(parent));
}

#[test]
fn test_hooks_driven_by_instrumented_host() {
    // An instrumented host calls the hooks itself instead of using Session
    let registry = fixtures::registry(fixtures::identity()).unwrap();
    let hooks = relink_session::Interceptor::new(&registry);
    let mut graph = EntityGraph::new();
    let passport = graph.insert("Passport");
    let person = graph.insert("Person");

    hooks.on_constructor_enter();
    hooks
        .on_field_assign(&mut graph, person, "passport", Some(passport))
        .unwrap();
    hooks.on_constructor_exit();
    assert_eq!(graph.ref_field(passport, "holder").unwrap(), None);

    hooks.on_constructed_object_ready(&mut graph, person).unwrap();

    assert_eq!(graph.ref_field(passport, "holder").unwrap(), Some(person));
    assert_eq!(construction_depth(), 0);
}
