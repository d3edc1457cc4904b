//! OneToMany / ManyToOne behaviour through collection and ref mutators.

mod common;

use pretty_assertions::assert_eq;
use relink_tests::prelude::*;
use std::collections::BTreeSet;

fn family_with(names: &[(&'static str, &'static str)]) -> Scenario {
    let names = names.to_vec();
    Scenario::new("family")
        .associations(fixtures::family())
        .step("create", move |w| {
            for (entity_type, name) in &names {
                w.create(entity_type, name)?;
            }
            Ok(())
        })
}

mod set {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_links_every_member() {
        common::init_tracing();
        family_with(&[("Parent", "p"), ("Child", "c1"), ("Child", "c2")])
            .step("set", |w| w.set_members("p", "children", &["c1", "c2"]))
            .check("children", |w| w.expect_members("p", "children", &["c1", "c2"]))
            .check("c1", |w| w.expect_ref("c1", "parent", Some("p")))
            .check("c2", |w| w.expect_ref("c2", "parent", Some("p")))
            .run()
            .unwrap();
    }

    #[test]
    fn test_set_replaces_and_unlinks() {
        family_with(&[("Parent", "p"), ("Child", "c1"), ("Child", "c2"), ("Child", "c3")])
            .step("first", |w| w.set_members("p", "children", &["c1", "c2"]))
            .step("second", |w| w.set_members("p", "children", &["c2", "c3"]))
            .check("children", |w| w.expect_members("p", "children", &["c2", "c3"]))
            .check("c1 released", |w| w.expect_ref("c1", "parent", None))
            .check("c3 linked", |w| w.expect_ref("c3", "parent", Some("p")))
            .run()
            .unwrap();
    }

    #[test]
    fn test_set_to_empty_releases_all() {
        family_with(&[("Parent", "p"), ("Child", "c1"), ("Child", "c2")])
            .step("fill", |w| w.set_members("p", "children", &["c1", "c2"]))
            .step("empty", |w| w.set_members("p", "children", &[]))
            .check("children", |w| w.expect_members("p", "children", &[]))
            .check("c1", |w| w.expect_ref("c1", "parent", None))
            .check("c2", |w| w.expect_ref("c2", "parent", None))
            .run()
            .unwrap();
    }

    #[test]
    fn test_set_with_current_contents_is_noop() {
        // GIVEN p.children = {c1} with changes flushed
        let registry = fixtures::registry(fixtures::family()).unwrap();
        let mut session = Session::new(&registry);
        let p = session.create("Parent").unwrap();
        let c1 = session.create("Child").unwrap();
        session.collection_mutator(p, "children").unwrap().set([c1]).unwrap();
        session.graph_mut().clear_changes(p).unwrap();
        session.graph_mut().clear_changes(c1).unwrap();

        // WHEN set to the same members
        session.collection_mutator(p, "children").unwrap().set([c1]).unwrap();

        // THEN nothing is marked changed
        assert!(session.graph().changed_fields(p).unwrap().is_empty());
        assert!(session.graph().changed_fields(c1).unwrap().is_empty());
        assert_eq!(session.ref_field(c1, "parent").unwrap(), Some(p));
    }

    #[test]
    fn test_set_steal_fails_and_changes_nothing() {
        // GIVEN c1 in p1, c2 in p2
        family_with(&[("Parent", "p1"), ("Parent", "p2"), ("Child", "c1"), ("Child", "c2")])
            .step("p1", |w| w.set_members("p1", "children", &["c1"]))
            .step("p2", |w| w.set_members("p2", "children", &["c2"]))
            // WHEN p1.children = {c2} would remove c1 and take c2
            .fails(
                "steal",
                |w| w.set_members("p1", "children", &["c2"]),
                |e| matches!(e, MutationError::AlreadyAssociated { .. }),
            )
            // THEN no write happened, including the pending removal
            .check("p1 kept", |w| w.expect_members("p1", "children", &["c1"]))
            .check("c1 kept", |w| w.expect_ref("c1", "parent", Some("p1")))
            .check("c2 kept", |w| w.expect_ref("c2", "parent", Some("p2")))
            .check("p2 kept", |w| w.expect_members("p2", "children", &["c2"]))
            .run()
            .unwrap();
    }
}

mod add_remove {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_links_child() {
        family_with(&[("Parent", "p"), ("Child", "c")])
            .step("add", |w| w.add("p", "children", "c"))
            .check("children", |w| w.expect_members("p", "children", &["c"]))
            .check("parent", |w| w.expect_ref("c", "parent", Some("p")))
            .run()
            .unwrap();
    }

    #[test]
    fn test_add_child_of_other_parent_fails() {
        family_with(&[("Parent", "p1"), ("Parent", "p2"), ("Child", "c")])
            .step("adopt", |w| w.add("p1", "children", "c"))
            .fails(
                "add to p2",
                |w| w.add("p2", "children", "c"),
                |e| matches!(e, MutationError::AlreadyAssociated { .. }),
            )
            .check("p2 empty", |w| w.expect_members("p2", "children", &[]))
            .check("still p1", |w| w.expect_ref("c", "parent", Some("p1")))
            .run()
            .unwrap();
    }

    #[test]
    fn test_remove_unlinks_child() {
        family_with(&[("Parent", "p"), ("Child", "c")])
            .step("add", |w| w.add("p", "children", "c"))
            .step("remove", |w| w.remove("p", "children", "c"))
            .check("children", |w| w.expect_members("p", "children", &[]))
            .check("parent", |w| w.expect_ref("c", "parent", None))
            .run()
            .unwrap();
    }

    #[test]
    fn test_remove_foreign_child_fails() {
        family_with(&[("Parent", "p1"), ("Parent", "p2"), ("Child", "c")])
            .step("adopt", |w| w.add("p1", "children", "c"))
            .fails(
                "remove from p2",
                |w| w.remove("p2", "children", "c"),
                |e| matches!(e, MutationError::NotAssociated { .. }),
            )
            .check("still p1", |w| w.expect_ref("c", "parent", Some("p1")))
            .check("p1 kept", |w| w.expect_members("p1", "children", &["c"]))
            .run()
            .unwrap();
    }
}

mod many_to_one {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assigning_parent_updates_collection() {
        family_with(&[("Parent", "p1"), ("Parent", "p2"), ("Child", "c")])
            .step("p1", |w| w.set_ref("c", "parent", Some("p1")))
            .check("in p1", |w| w.expect_members("p1", "children", &["c"]))
            .step("p2", |w| w.set_ref("c", "parent", Some("p2")))
            .check("left p1", |w| w.expect_members("p1", "children", &[]))
            .check("in p2", |w| w.expect_members("p2", "children", &["c"]))
            .step("orphan", |w| w.set_ref("c", "parent", None))
            .check("left p2", |w| w.expect_members("p2", "children", &[]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_plain_field_write_relinks() {
        // Field writes outside construction relink before the write
        family_with(&[("Parent", "p"), ("Child", "c")])
            .step("assign", |w| w.assign_ref("c", "parent", Some("p")))
            .check("in p", |w| w.expect_members("p", "children", &["c"]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_unidirectional_field_touches_nothing_else() {
        family_with(&[("School", "s"), ("Child", "c")])
            .step("enrol", |w| w.set_ref("c", "school", Some("s")))
            .check("school", |w| w.expect_ref("c", "school", Some("s")))
            .check("school untouched", |w| {
                let s = w.id("s");
                let fields = &w.session().graph().get(s).map_err(|e| e.to_string())?.fields;
                if fields.is_empty() {
                    Ok(())
                } else {
                    Err(format!("school gained fields {:?}", fields.keys()))
                }
            })
            .run()
            .unwrap();
    }
}

mod unidirectional {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_many_to_many_is_plain() {
        let registry = fixtures::registry(fixtures::blog()).unwrap();
        let mut session = Session::new(&registry);
        let post = session.create("Post").unwrap();
        let t1 = session.create("Tag").unwrap();
        let t2 = session.create("Tag").unwrap();

        let mut tags = session.collection_mutator(post, "tags").unwrap();
        tags.set([t1, t2]).unwrap();
        tags.remove(t1).unwrap();
        tags.add(t1).unwrap();
        tags.remove(t2).unwrap();

        assert_eq!(session.collection(post, "tags").unwrap(), BTreeSet::from([t1]));
        assert!(session.graph().get(t1).unwrap().fields.is_empty());
    }

    #[test]
    fn test_unpaired_one_to_many_does_not_link() {
        let registry = fixtures::registry(fixtures::blog()).unwrap();
        let mut session = Session::new(&registry);
        let user = session.create("User").unwrap();
        let post = session.create("Post").unwrap();

        session
            .collection_mutator(user, "drafts")
            .unwrap()
            .add(post)
            .unwrap();

        assert_eq!(session.ref_field(post, "author").unwrap(), None);
    }
}
