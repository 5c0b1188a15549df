#![allow(clippy::float_cmp)]

use super::*;
use crate::element::Shape;

fn rect() -> Element {
    Element::rect(0.0, 0.0, 100.0, 80.0)
}

// =============================================================
// DocStore basics
// =============================================================

#[test]
fn new_store_is_empty() {
    let doc = DocStore::new();
    assert!(doc.is_empty());
    assert_eq!(doc.len(), 0);
    assert!(doc.selection().is_empty());
}

#[test]
fn add_preserves_insertion_order() {
    let mut doc = DocStore::new();
    let a = rect();
    let b = rect();
    let c = rect();
    let ids = [a.id, b.id, c.id];
    doc.add_element(a);
    doc.add_element(b);
    doc.add_element(c);
    let order: Vec<_> = doc.elements().iter().map(|e| e.id).collect();
    assert_eq!(order, ids);
}

#[test]
fn add_same_id_replaces_in_place() {
    let mut doc = DocStore::new();
    let a = rect();
    let b = rect();
    let a_id = a.id;
    doc.add_element(a.clone());
    doc.add_element(b);
    let mut moved = a;
    moved.x = 500.0;
    doc.add_element(moved);
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.elements()[0].id, a_id);
    assert_eq!(doc.elements()[0].x, 500.0);
}

#[test]
fn update_existing_returns_true() {
    let mut doc = DocStore::new();
    let a = rect();
    let id = a.id;
    doc.add_element(a);
    assert!(doc.update_element(&id, &ElementPatch { width: Some(40.0), ..Default::default() }));
    let Shape::Rect { width, .. } = doc.get(&id).unwrap().shape else {
        panic!("expected rect");
    };
    assert_eq!(width, 40.0);
}

#[test]
fn update_missing_returns_false() {
    let mut doc = DocStore::new();
    doc.add_element(rect());
    let before = doc.elements().to_vec();
    assert!(!doc.update_element(&uuid::Uuid::new_v4(), &ElementPatch::placement(1.0, 1.0, 0.0)));
    assert_eq!(doc.elements(), before.as_slice());
}

#[test]
fn remove_drops_from_selection() {
    let mut doc = DocStore::new();
    let a = rect();
    let id = a.id;
    doc.add_element(a);
    doc.selection_mut().set_single(id);
    assert!(doc.remove_element(&id).is_some());
    assert!(doc.selection().is_empty());
    assert!(doc.get(&id).is_none());
}

#[test]
fn remove_missing_is_none() {
    let mut doc = DocStore::new();
    assert!(doc.remove_element(&uuid::Uuid::new_v4()).is_none());
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn load_snapshot_replaces_and_clears_selection() {
    let mut doc = DocStore::new();
    let a = rect();
    let a_id = a.id;
    doc.add_element(a);
    doc.selection_mut().set_single(a_id);

    let b = rect();
    let b_id = b.id;
    doc.load_snapshot(vec![b]).unwrap();
    assert_eq!(doc.len(), 1);
    assert!(doc.get(&b_id).is_some());
    assert!(doc.selection().is_empty());
}

#[test]
fn load_snapshot_rejects_duplicate_ids() {
    let mut doc = DocStore::new();
    let existing = rect();
    doc.add_element(existing.clone());
    let a = rect();
    let result = doc.load_snapshot(vec![a.clone(), a]);
    assert!(matches!(result, Err(EditorError::DuplicateId(_))));
    assert_eq!(doc.elements(), std::slice::from_ref(&existing));
}

#[test]
fn json_roundtrip_preserves_order() {
    let mut doc = DocStore::new();
    doc.add_element(Element::circle(10.0, 10.0, 5.0));
    doc.add_element(Element::text(0.0, 0.0, "hi", 20.0, 100.0));
    let json = doc.to_json().unwrap();

    let mut other = DocStore::new();
    other.load_json(&json).unwrap();
    assert_eq!(other.elements(), doc.elements());
}

#[test]
fn load_json_malformed_is_error() {
    let mut doc = DocStore::new();
    assert!(matches!(doc.load_json("{ nope"), Err(EditorError::Json(_))));
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selection_single_only_when_one() {
    let mut sel = Selection::default();
    assert_eq!(sel.single(), None);
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    sel.set_single(a);
    assert_eq!(sel.single(), Some(a));
    sel.toggle(b);
    assert_eq!(sel.single(), None);
    assert_eq!(sel.ids(), &[a, b]);
}

#[test]
fn selection_toggle_removes_present() {
    let mut sel = Selection::default();
    let a = uuid::Uuid::new_v4();
    sel.toggle(a);
    sel.toggle(a);
    assert!(sel.is_empty());
}

#[test]
fn selection_set_single_replaces() {
    let mut sel = Selection::default();
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    sel.toggle(a);
    sel.set_single(b);
    assert_eq!(sel.ids(), &[b]);
    assert!(!sel.contains(&a));
}

// =============================================================
// Drawing config
// =============================================================

#[test]
fn drawing_defaults_disabled() {
    let doc = DocStore::new();
    assert!(!doc.drawing().enabled);
    assert_eq!(doc.drawing().opacity, 1.0);
}

#[test]
fn drawing_config_partial_json() {
    let cfg: DrawingConfig = serde_json::from_str(r##"{ "enabled": true, "color": "#ff0000" }"##).unwrap();
    assert!(cfg.enabled);
    assert_eq!(cfg.color, "#ff0000");
    assert_eq!(cfg.brush_size, 4.0);
}
