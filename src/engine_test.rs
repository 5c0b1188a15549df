#![allow(clippy::float_cmp)]

use super::*;
use crate::element::Shape;

// =============================================================
// Helpers
// =============================================================

fn core_with(elements: Vec<Element>) -> EngineCore {
    let mut doc = DocStore::new();
    for el in elements {
        doc.add_element(el);
    }
    EngineCore::with_doc(doc, EditorConfig::default())
}

fn no_snap(mut core: EngineCore) -> EngineCore {
    core.config.snapping = false;
    core
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn down(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary, no_modifiers())
}

fn shift_down(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary, Modifiers::shift())
}

fn mv(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_move(pt(x, y), no_modifiers())
}

fn up(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_up(pt(x, y), Button::Primary, no_modifiers())
}

fn click(core: &mut EngineCore, x: f64, y: f64) {
    down(core, x, y);
    up(core, x, y);
}

fn updates(actions: &[Action]) -> Vec<(ElementId, ElementPatch)> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::ElementUpdated { id, patch } => Some((*id, patch.clone())),
            _ => None,
        })
        .collect()
}

fn selection_changes(actions: &[Action]) -> Vec<Vec<ElementId>> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::SelectionChanged(ids) => Some(ids.clone()),
            _ => None,
        })
        .collect()
}

fn has_created(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::ElementCreated(_)))
}

fn text_of(core: &EngineCore, id: &ElementId) -> String {
    match &core.element(id).unwrap().shape {
        Shape::Text { text, .. } => text.clone(),
        other => panic!("not a text element: {other:?}"),
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// =============================================================
// Construction
// =============================================================

#[test]
fn core_new_is_empty() {
    let core = EngineCore::new();
    assert!(core.selection().is_empty());
    assert_eq!(core.zoom(), 1.0);
    assert!(core.text_edit().is_none());
    assert!(core.doc.is_empty());
}

#[test]
fn with_doc_syncs_stage() {
    let el = Element::rect(10.0, 20.0, 30.0, 40.0);
    let id = el.id;
    let core = core_with(vec![el]);
    let node = core.node(&id).unwrap();
    assert_eq!((node.x, node.y, node.scale_x, node.scale_y), (10.0, 20.0, 1.0, 1.0));
}

#[test]
fn action_serializes_adjacently_tagged() {
    let json = serde_json::to_value(Action::ZoomChanged(0.5)).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "ZoomChanged", "data": 0.5 }));
}

// =============================================================
// Selection
// =============================================================

#[test]
fn click_body_selects() {
    let el = Element::rect(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    let actions = down(&mut core, 150.0, 150.0);
    assert_eq!(selection_changes(&actions), vec![vec![id]]);
    assert_eq!(core.selection(), &[id]);
    assert!(updates(&up(&mut core, 150.0, 150.0)).is_empty());
}

#[test]
fn click_empty_clears_selection() {
    let el = Element::rect(100.0, 100.0, 200.0, 100.0);
    let mut core = core_with(vec![el]);
    click(&mut core, 150.0, 150.0);
    let actions = down(&mut core, 800.0, 500.0);
    assert_eq!(selection_changes(&actions), vec![Vec::<ElementId>::new()]);
    assert!(core.selection().is_empty());
}

#[test]
fn click_empty_without_selection_is_quiet() {
    let mut core = core_with(vec![]);
    let actions = down(&mut core, 10.0, 10.0);
    assert!(selection_changes(&actions).is_empty());
}

#[test]
fn shift_click_toggles_membership() {
    let a = Element::rect(0.0, 0.0, 50.0, 50.0);
    let b = Element::rect(200.0, 200.0, 50.0, 50.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut core = core_with(vec![a, b]);

    click(&mut core, 10.0, 10.0);
    shift_down(&mut core, 210.0, 210.0);
    up(&mut core, 210.0, 210.0);
    assert_eq!(core.selection(), &[a_id, b_id]);
    assert!(core.handles_target().is_none());

    shift_down(&mut core, 210.0, 210.0);
    assert_eq!(core.selection(), &[a_id]);
    assert!(core.input.is_idle());
}

#[test]
fn secondary_button_is_ignored() {
    let el = Element::rect(0.0, 0.0, 50.0, 50.0);
    let mut core = core_with(vec![el]);
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Secondary, no_modifiers());
    assert!(actions.is_empty());
    assert!(core.selection().is_empty());
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_commits_placement_only() {
    let el = Element::rect(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let mut core = no_snap(core_with(vec![el]));

    down(&mut core, 150.0, 150.0);
    mv(&mut core, 180.0, 170.0);
    let actions = up(&mut core, 180.0, 170.0);

    assert_eq!(updates(&actions), vec![(id, ElementPatch::placement(130.0, 120.0, 0.0))]);
    let el = core.element(&id).unwrap();
    assert_eq!((el.x, el.y), (130.0, 120.0));
    assert_eq!(el.local_bounds().width, 200.0);
}

#[test]
fn drag_snaps_left_edge_to_canvas() {
    let el = Element::rect(100.0, 100.0, 50.0, 50.0);
    let id = el.id;
    let mut core = core_with(vec![el]);

    down(&mut core, 120.0, 120.0);
    mv(&mut core, 24.0, 120.0);
    assert_eq!(core.node(&id).unwrap().x, 0.0);
    assert_eq!(core.guides(), &[Guide { axis: snap::GuideAxis::Vertical, position: 0.0 }]);

    let actions = up(&mut core, 24.0, 120.0);
    assert_eq!(updates(&actions)[0].1.x, Some(0.0));
    assert!(core.guides().is_empty());
}

#[test]
fn drag_beyond_threshold_does_not_snap() {
    let el = Element::rect(100.0, 100.0, 50.0, 50.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    down(&mut core, 120.0, 120.0);
    mv(&mut core, 40.0, 120.0);
    assert_eq!(core.node(&id).unwrap().x, 20.0);
    assert!(core.guides().is_empty());
}

#[test]
fn alt_disables_snapping() {
    let el = Element::rect(100.0, 100.0, 50.0, 50.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    down(&mut core, 120.0, 120.0);
    core.on_pointer_move(pt(24.0, 120.0), Modifiers { alt: true, ..Default::default() });
    assert_eq!(core.node(&id).unwrap().x, 4.0);
}

#[test]
fn drag_moves_whole_selection() {
    let a = Element::rect(100.0, 100.0, 50.0, 50.0);
    let b = Element::rect(300.0, 300.0, 50.0, 50.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut core = no_snap(core_with(vec![a, b]));

    click(&mut core, 110.0, 110.0);
    shift_down(&mut core, 310.0, 310.0);
    up(&mut core, 310.0, 310.0);

    down(&mut core, 320.0, 320.0);
    mv(&mut core, 330.0, 340.0);
    let actions = up(&mut core, 330.0, 340.0);

    let ups = updates(&actions);
    assert_eq!(ups.len(), 2);
    assert_eq!(ups[0], (a_id, ElementPatch::placement(110.0, 120.0, 0.0)));
    assert_eq!(ups[1], (b_id, ElementPatch::placement(310.0, 320.0, 0.0)));
}

// =============================================================
// Resize and rotate
// =============================================================

#[test]
fn resize_se_handle_commits_dimensions() {
    let el = Element::rect(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 150.0, 150.0);

    down(&mut core, 300.0, 200.0);
    assert!(matches!(core.input, InputState::Resizing { .. }));
    mv(&mut core, 500.0, 300.0);
    let live = core.node(&id).unwrap();
    assert!(approx(live.scale_x, 2.0) && approx(live.scale_y, 2.0));

    let actions = up(&mut core, 500.0, 300.0);
    let ups = updates(&actions);
    assert_eq!(ups.len(), 1);
    assert!(approx(ups[0].1.width.unwrap(), 400.0));
    assert!(approx(ups[0].1.height.unwrap(), 200.0));
    let node = core.node(&id).unwrap();
    assert_eq!((node.scale_x, node.scale_y), (1.0, 1.0));
    assert!(approx(node.x, 100.0) && approx(node.y, 100.0));
}

#[test]
fn resize_circle_corner_is_uniform() {
    let el = Element::circle(200.0, 200.0, 50.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 200.0, 200.0);

    down(&mut core, 250.0, 250.0);
    mv(&mut core, 300.0, 260.0);
    let actions = up(&mut core, 300.0, 260.0);

    let patch = &updates(&actions)[0].1;
    assert!(approx(patch.radius.unwrap(), 75.0));
    assert!(approx(patch.x.unwrap(), 225.0));
    assert!(approx(core.element(&id).unwrap().local_bounds().width, 150.0));
}

#[test]
fn resize_text_corner_scales_font() {
    let el = Element::text(100.0, 100.0, "Hi", 24.0, 200.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 110.0, 110.0);

    let bottom = 100.0 + 24.0 * 1.2;
    down(&mut core, 300.0, bottom);
    mv(&mut core, 500.0, bottom + 24.0 * 1.2);
    up(&mut core, 500.0, bottom + 24.0 * 1.2);

    let Shape::Text { font_size, width, .. } = &core.element(&id).unwrap().shape else {
        panic!("expected text");
    };
    assert_eq!(*font_size, 48.0);
    assert!(approx(*width, 400.0));
}

#[test]
fn rotate_handle_turns_around_center() {
    let el = Element::rect(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 150.0, 150.0);

    down(&mut core, 200.0, 76.0);
    assert!(matches!(core.input, InputState::Rotating { .. }));
    mv(&mut core, 300.0, 150.0);
    let actions = up(&mut core, 300.0, 150.0);

    let patch = &updates(&actions)[0].1;
    assert!(approx(patch.rotation.unwrap(), 90.0));
    assert!(approx(patch.x.unwrap(), 250.0));
    assert!(approx(patch.y.unwrap(), 50.0));
    assert!(approx(core.element(&id).unwrap().local_bounds().width, 200.0));
}

#[test]
fn rotate_with_shift_snaps_to_step() {
    let el = Element::rect(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 150.0, 150.0);

    down(&mut core, 200.0, 76.0);
    let r = 74.0;
    let a = 20f64.to_radians();
    core.on_pointer_move(pt(200.0 + r * a.sin(), 150.0 - r * a.cos()), Modifiers::shift());
    assert!(approx(core.node(&id).unwrap().rotation, 15.0));
}

#[test]
fn removed_mid_gesture_drops_commit() {
    let el = Element::rect(100.0, 100.0, 200.0, 100.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 150.0, 150.0);
    down(&mut core, 300.0, 200.0);
    mv(&mut core, 400.0, 250.0);

    core.remove_element(&id);
    let actions = up(&mut core, 400.0, 250.0);
    assert!(updates(&actions).is_empty());
    assert!(core.doc.is_empty());
}

#[test]
fn host_commit_reinterprets_each_selected_element() {
    let rect = Element::rect(0.0, 0.0, 100.0, 50.0);
    let path = Element::path(200.0, 200.0, "M0 0 L10 10", 10.0, 10.0);
    let (rect_id, path_id) = (rect.id, path.id);
    let mut core = core_with(vec![rect, path]);
    core.doc.selection_mut().set_single(rect_id);
    core.doc.selection_mut().toggle(path_id);
    core.stage.set_node(&rect_id, NodeState { x: 0.0, y: 0.0, rotation: 0.0, scale_x: 2.0, scale_y: 3.0 });
    core.stage.set_node(&path_id, NodeState { x: 200.0, y: 200.0, rotation: 0.0, scale_x: 2.0, scale_y: 3.0 });

    let ups = updates(&core.commit_transform());
    assert_eq!(ups.len(), 2);
    assert_eq!(ups[0].1.width, Some(200.0));
    assert_eq!(ups[1].1.scale_x, Some(2.0));
    assert_eq!(core.node(&rect_id).unwrap().scale_x, 1.0);
    assert_eq!(core.node(&path_id).unwrap().scale_x, 2.0);
}

// =============================================================
// Freehand
// =============================================================

fn drawing_on() -> DrawingConfig {
    DrawingConfig { enabled: true, ..DrawingConfig::default() }
}

#[test]
fn freehand_stroke_commits_line() {
    let mut core = core_with(vec![]);
    core.set_drawing(drawing_on());
    core.set_zoom(2.0);

    down(&mut core, 20.0, 40.0);
    mv(&mut core, 60.0, 80.0);
    let actions = up(&mut core, 60.0, 80.0);

    let created: Vec<&Element> = actions
        .iter()
        .filter_map(|a| match a {
            Action::ElementCreated(el) => Some(el),
            _ => None,
        })
        .collect();
    assert_eq!(created.len(), 1);
    let Shape::Line { points, .. } = &created[0].shape else {
        panic!("expected line");
    };
    assert_eq!(points, &vec![10.0, 20.0, 30.0, 40.0]);
    assert_eq!(core.doc.len(), 1);
}

#[test]
fn freehand_single_point_creates_nothing() {
    let mut core = core_with(vec![]);
    core.set_drawing(drawing_on());
    down(&mut core, 20.0, 40.0);
    let actions = up(&mut core, 20.0, 40.0);
    assert!(!has_created(&actions));
    assert!(core.doc.is_empty());
}

#[test]
fn pointer_up_without_down_is_noop() {
    let mut core = core_with(vec![]);
    core.set_drawing(drawing_on());
    assert!(up(&mut core, 20.0, 40.0).is_empty());
}

#[test]
fn drawing_mode_leaves_selection_alone() {
    let el = Element::rect(0.0, 0.0, 50.0, 50.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 10.0, 10.0);
    core.set_drawing(drawing_on());

    let actions = down(&mut core, 500.0, 500.0);
    assert!(selection_changes(&actions).is_empty());
    assert_eq!(core.selection(), &[id]);
    assert!(core.input.is_idle());
}

#[test]
fn disabling_drawing_drops_stroke() {
    let mut core = core_with(vec![]);
    core.set_drawing(drawing_on());
    down(&mut core, 0.0, 0.0);
    mv(&mut core, 10.0, 10.0);
    core.set_drawing(DrawingConfig::default());
    assert!(!core.freehand.is_capturing());
    assert!(up(&mut core, 10.0, 10.0).is_empty());
}

// =============================================================
// Inline text editing
// =============================================================

fn editing_core() -> (EngineCore, ElementId) {
    let el = Element::text(100.0, 100.0, "Hi", 24.0, 200.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    core.set_stage_offset(pt(10.0, 20.0));
    click(&mut core, 110.0, 110.0);
    core.on_double_click(pt(110.0, 110.0));
    (core, id)
}

#[test]
fn double_click_text_opens_overlay() {
    let el = Element::text(100.0, 100.0, "Hi", 24.0, 200.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    core.set_stage_offset(pt(10.0, 20.0));
    click(&mut core, 110.0, 110.0);

    let actions = core.on_double_click(pt(110.0, 110.0));
    let Some(Action::EditTextRequested(overlay)) = actions.first() else {
        panic!("expected overlay request, got {actions:?}");
    };
    assert_eq!((overlay.left, overlay.top), (110.0, 120.0));
    assert_eq!(overlay.element_id, id);
    assert!(!core.is_node_visible(&id));
    assert!(core.handles_target().is_none());
}

#[test]
fn double_click_non_text_does_nothing() {
    let el = Element::rect(0.0, 0.0, 50.0, 50.0);
    let mut core = core_with(vec![el]);
    assert!(core.on_double_click(pt(10.0, 10.0)).is_empty());
    assert!(core.text_edit().is_none());
}

#[test]
fn second_editor_is_refused() {
    let (mut core, id) = editing_core();
    assert!(core.on_double_click(pt(110.0, 110.0)).is_empty());
    assert_eq!(core.text_edit().unwrap().element_id(), id);
}

#[test]
fn enter_commits_text_and_restores_node() {
    let (mut core, id) = editing_core();
    let actions = core.text_edit_input("New", 30.0);
    assert_eq!(actions, vec![Action::EditTextResized { height: 30.0 }]);

    let actions = core.text_edit_key(&Key::new("Enter"), no_modifiers());
    assert!(actions.contains(&Action::EditTextClosed { id }));
    assert_eq!(updates(&actions)[0].1.text.as_deref(), Some("New"));
    assert_eq!(text_of(&core, &id), "New");
    assert!(core.is_node_visible(&id));
    assert_eq!(core.handles_target(), Some(id));
}

#[test]
fn shift_enter_keeps_editing() {
    let (mut core, _) = editing_core();
    assert!(core.text_edit_key(&Key::new("Enter"), Modifiers::shift()).is_empty());
    assert!(core.text_edit().is_some());
}

#[test]
fn escape_reverts_text() {
    let (mut core, id) = editing_core();
    core.text_edit_input("Changed", 30.0);
    let actions = core.text_edit_key(&Key::new("Escape"), no_modifiers());
    assert_eq!(updates(&actions)[0].1.text.as_deref(), Some("Hi"));
    assert_eq!(text_of(&core, &id), "Hi");
    assert!(core.is_node_visible(&id));
}

#[test]
fn blur_commits() {
    let (mut core, id) = editing_core();
    core.text_edit_input("Blurred", 30.0);
    core.text_edit_blur();
    assert_eq!(text_of(&core, &id), "Blurred");
    assert!(core.text_edit().is_none());
}

#[test]
fn canvas_press_commits_open_edit() {
    let (mut core, id) = editing_core();
    core.text_edit_input("Pressed", 30.0);
    let actions = down(&mut core, 800.0, 500.0);
    assert!(actions.contains(&Action::EditTextClosed { id }));
    assert_eq!(text_of(&core, &id), "Pressed");
}

#[test]
fn key_down_routes_to_open_editor() {
    let (mut core, id) = editing_core();
    core.on_key_down(&Key::new("Escape"), no_modifiers());
    assert!(core.text_edit().is_none());
    assert_eq!(core.selection(), &[id]);
}

#[test]
fn removing_edited_element_closes_editor() {
    let (mut core, id) = editing_core();
    let actions = core.remove_element(&id);
    assert!(actions.contains(&Action::EditTextClosed { id }));
    assert!(core.text_edit().is_none());
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn arrows_nudge_selection() {
    let el = Element::rect(100.0, 100.0, 50.0, 50.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    click(&mut core, 110.0, 110.0);

    let actions = core.on_key_down(&Key::new("ArrowRight"), no_modifiers());
    assert_eq!(updates(&actions), vec![(id, ElementPatch::placement(101.0, 100.0, 0.0))]);
    core.on_key_down(&Key::new("ArrowDown"), Modifiers::shift());
    let el = core.element(&id).unwrap();
    assert_eq!((el.x, el.y), (101.0, 110.0));
}

#[test]
fn arrows_without_selection_do_nothing() {
    let mut core = core_with(vec![Element::rect(0.0, 0.0, 50.0, 50.0)]);
    assert!(core.on_key_down(&Key::new("ArrowLeft"), no_modifiers()).is_empty());
}

#[test]
fn escape_clears_selection() {
    let el = Element::rect(0.0, 0.0, 50.0, 50.0);
    let mut core = core_with(vec![el]);
    click(&mut core, 10.0, 10.0);
    let actions = core.on_key_down(&Key::new("Escape"), no_modifiers());
    assert_eq!(selection_changes(&actions), vec![Vec::<ElementId>::new()]);
    assert!(core.selection().is_empty());
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn container_resize_fits_until_manual_zoom() {
    let mut core = core_with(vec![]);
    assert_eq!(core.on_container_resize(1000.0, 800.0)[0], Action::ZoomChanged(1.0));
    assert_eq!(core.on_container_resize(520.0, 310.0)[0], Action::ZoomChanged(0.5));
    assert!(core.on_container_resize(1000.0, 800.0).is_empty());
    assert_eq!(core.zoom(), 0.5);

    core.set_zoom(2.0);
    assert!(core.on_container_resize(520.0, 310.0).is_empty());
    assert_eq!(core.zoom(), 2.0);

    core.set_zoom(1.0);
    assert_eq!(core.on_container_resize(520.0, 310.0)[0], Action::ZoomChanged(0.5));
}

#[test]
fn set_zoom_clamps() {
    let mut core = core_with(vec![]);
    assert_eq!(core.set_zoom(10.0)[0], Action::ZoomChanged(4.0));
    assert_eq!(core.set_zoom(0.0)[0], Action::ZoomChanged(0.1));
}

#[test]
fn zoom_converts_pointer_to_logical() {
    let el = Element::rect(100.0, 100.0, 50.0, 50.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    core.set_zoom(0.5);
    down(&mut core, 60.0, 60.0);
    assert_eq!(core.selection(), &[id]);
}

// =============================================================
// Data inputs
// =============================================================

#[test]
fn load_json_rejects_duplicate_ids() {
    let el = Element::rect(0.0, 0.0, 10.0, 10.0);
    let json = serde_json::to_string(&vec![el.clone(), el]).unwrap();
    let mut core = core_with(vec![]);
    assert!(matches!(core.load_json(&json), Err(EditorError::DuplicateId(_))));
    assert!(core.doc.is_empty());
}

#[test]
fn load_snapshot_resets_session() {
    let (mut core, old_id) = editing_core();
    let fresh = Element::rect(5.0, 5.0, 10.0, 10.0);
    let fresh_id = fresh.id;
    core.load_snapshot(vec![fresh]).unwrap();
    assert!(core.text_edit().is_none());
    assert!(core.selection().is_empty());
    assert!(core.node(&old_id).is_none());
    assert!(core.node(&fresh_id).is_some());
}

#[test]
fn apply_update_syncs_node() {
    let el = Element::rect(0.0, 0.0, 10.0, 10.0);
    let id = el.id;
    let mut core = core_with(vec![el]);
    core.apply_update(&id, &ElementPatch::placement(40.0, 50.0, 10.0));
    let node = core.node(&id).unwrap();
    assert_eq!((node.x, node.y, node.rotation), (40.0, 50.0, 10.0));
}

#[test]
fn hover_emits_cursor_changes_once() {
    let el = Element::rect(100.0, 100.0, 50.0, 50.0);
    let mut core = core_with(vec![el]);
    assert_eq!(mv(&mut core, 110.0, 110.0), vec![Action::SetCursor("move".to_owned())]);
    assert!(mv(&mut core, 115.0, 115.0).is_empty());
    assert_eq!(mv(&mut core, 500.0, 500.0), vec![Action::SetCursor("default".to_owned())]);
}
