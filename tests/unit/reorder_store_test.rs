//! Unit tests for persisted reordering of links and child links.

use newtab::database::Database;
use newtab::managers::link_manager::{LinkManager, LinkManagerTrait};
use newtab::types::link::{Link, NewChildLink, NewLink};

fn setup() -> Database {
    Database::open_in_memory().unwrap()
}

fn make_link(mgr: &mut LinkManager, owner: Option<&str>, label: &str) -> Link {
    mgr.create(NewLink {
        owner_id: owner.map(str::to_string),
        href: Some(format!("https://{}.example.com", label)),
        label: label.to_string(),
        icon: "i".to_string(),
        ..Default::default()
    })
    .unwrap()
}

fn labels(mgr: &LinkManager, owner: Option<&str>) -> Vec<String> {
    mgr.list(owner)
        .unwrap()
        .into_iter()
        .map(|l| l.label)
        .collect()
}

#[test]
fn test_reorder_applies_index_as_position() {
    let db = setup();
    let mut mgr = LinkManager::new(db.connection());
    let a = make_link(&mut mgr, Some("u1"), "a");
    let b = make_link(&mut mgr, Some("u1"), "b");
    let c = make_link(&mut mgr, Some("u1"), "c");

    // Drag c to the front.
    mgr.reorder(Some("u1"), &[c.id.clone(), a.id.clone(), b.id.clone()])
        .unwrap();

    assert_eq!(labels(&mgr, Some("u1")), ["c", "a", "b"]);
    let positions: Vec<i32> = mgr
        .list(Some("u1"))
        .unwrap()
        .into_iter()
        .map(|l| l.position)
        .collect();
    assert_eq!(positions, [0, 1, 2]);
}

#[test]
fn test_reorder_is_idempotent() {
    let db = setup();
    let mut mgr = LinkManager::new(db.connection());
    let a = make_link(&mut mgr, Some("u1"), "a");
    let b = make_link(&mut mgr, Some("u1"), "b");

    let order = [b.id.clone(), a.id.clone()];
    mgr.reorder(Some("u1"), &order).unwrap();
    let first = labels(&mgr, Some("u1"));
    mgr.reorder(Some("u1"), &order).unwrap();
    assert_eq!(labels(&mgr, Some("u1")), first);
}

#[test]
fn test_reorder_ignores_foreign_ids() {
    let db = setup();
    let mut mgr = LinkManager::new(db.connection());
    let mine = make_link(&mut mgr, Some("u1"), "mine");
    let other = make_link(&mut mgr, Some("u2"), "other");

    // Another owner's id in the batch must not move their link.
    mgr.reorder(Some("u1"), &[other.id.clone(), mine.id.clone()])
        .unwrap();

    let other = mgr.get(&other.id).unwrap();
    assert_eq!(other.position, 0);
    let mine = mgr.get(&mine.id).unwrap();
    assert_eq!(mine.position, 1);
}

#[test]
fn test_reorder_empty_batch_is_a_no_op() {
    let db = setup();
    let mut mgr = LinkManager::new(db.connection());
    make_link(&mut mgr, Some("u1"), "a");
    make_link(&mut mgr, Some("u1"), "b");

    mgr.reorder(Some("u1"), &[]).unwrap();
    assert_eq!(labels(&mgr, Some("u1")), ["a", "b"]);
}

#[test]
fn test_reorder_children_is_scoped_to_parent() {
    let db = setup();
    let mut mgr = LinkManager::new(db.connection());
    let p1 = make_link(&mut mgr, Some("u1"), "p1");
    let p2 = make_link(&mut mgr, Some("u1"), "p2");

    let mut child = |parent: &str, label: &str| {
        mgr.add_child(NewChildLink {
            parent_id: parent.to_string(),
            href: format!("https://{}.example.com", label),
            label: label.to_string(),
            icon: "i".to_string(),
            ..Default::default()
        })
        .unwrap()
    };
    let a = child(&p1.id, "a");
    let b = child(&p1.id, "b");
    let x = child(&p2.id, "x");

    // Reordering p1's children must not touch p2's, even if its id sneaks in.
    mgr.reorder_children(&p1.id, &[b.id.clone(), a.id.clone(), x.id.clone()])
        .unwrap();

    let p1_labels: Vec<String> = mgr
        .children_of(&p1.id)
        .unwrap()
        .into_iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(p1_labels, ["b", "a"]);

    let x = mgr.children_of(&p2.id).unwrap();
    assert_eq!(x[0].position, 0);
}

#[test]
fn test_create_after_reorder_appends_at_end() {
    let db = setup();
    let mut mgr = LinkManager::new(db.connection());
    let a = make_link(&mut mgr, Some("u1"), "a");
    let b = make_link(&mut mgr, Some("u1"), "b");

    mgr.reorder(Some("u1"), &[b.id.clone(), a.id.clone()]).unwrap();
    let c = make_link(&mut mgr, Some("u1"), "c");

    assert_eq!(c.position, 2);
    assert_eq!(labels(&mgr, Some("u1")), ["b", "a", "c"]);
}
