#![allow(clippy::float_cmp)]

use super::*;

fn text_el() -> Element {
    let mut el = Element::text(100.0, 50.0, "Hello", 24.0, 200.0);
    el.rotation = 30.0;
    el
}

fn zoomed(zoom: f64, offset: Point) -> Viewport {
    let mut vp = Viewport::default();
    vp.set_zoom(zoom);
    vp.stage_offset = offset;
    vp
}

// =============================================================
// TextOverlay
// =============================================================

#[test]
fn overlay_position_adds_stage_offset_to_zoomed_canvas_position() {
    let overlay = TextOverlay::for_element(&text_el(), &zoomed(0.5, Point::new(30.0, 40.0))).unwrap();
    assert_eq!(overlay.left, 80.0);
    assert_eq!(overlay.top, 65.0);
}

#[test]
fn overlay_style_scales_with_zoom() {
    let overlay = TextOverlay::for_element(&text_el(), &zoomed(2.0, Point::default())).unwrap();
    assert_eq!(overlay.font_size_px, 48.0);
    assert_eq!(overlay.width, 400.0);
    assert_eq!(overlay.rotation, 30.0);
    assert_eq!(overlay.align, TextAlign::Left);
    assert_eq!(overlay.text, "Hello");
    assert!((overlay.height - 48.0 * 1.2).abs() < 1e-9);
}

#[test]
fn overlay_for_non_text_is_none() {
    let rect = Element::rect(0.0, 0.0, 10.0, 10.0);
    assert!(TextOverlay::for_element(&rect, &Viewport::default()).is_none());
}

#[test]
fn overlay_serializes_camel_case() {
    let overlay = TextOverlay::for_element(&text_el(), &Viewport::default()).unwrap();
    let json = serde_json::to_value(&overlay).unwrap();
    assert_eq!(json["fontSizePx"], 24.0);
    assert_eq!(json["align"], "left");
}

// =============================================================
// TextEditSession
// =============================================================

#[test]
fn open_only_on_text() {
    assert!(TextEditSession::open(&text_el(), &Viewport::default()).is_some());
    assert!(TextEditSession::open(&Element::circle(0.0, 0.0, 10.0), &Viewport::default()).is_none());
}

#[test]
fn input_grows_height() {
    let mut session = TextEditSession::open(&text_el(), &Viewport::default()).unwrap();
    let h = session.input("Hello\nworld\nagain", 90.0);
    assert_eq!(h, 90.0);
    assert_eq!(session.overlay().height, 90.0);
    assert_eq!(session.text(), "Hello\nworld\nagain");
}

#[test]
fn input_height_never_below_one_line() {
    let mut session = TextEditSession::open(&text_el(), &Viewport::default()).unwrap();
    let h = session.input("", 0.0);
    assert!((h - 24.0 * 1.2).abs() < 1e-9);
}

#[test]
fn commit_returns_edited_text() {
    let el = text_el();
    let mut session = TextEditSession::open(&el, &Viewport::default()).unwrap();
    session.input("Changed", 30.0);
    assert_eq!(session.commit(), (el.id, "Changed".to_owned()));
}

#[test]
fn cancel_returns_original_text() {
    let el = text_el();
    let mut session = TextEditSession::open(&el, &Viewport::default()).unwrap();
    session.input("Changed", 30.0);
    assert_eq!(session.original_text(), "Hello");
    assert_eq!(session.cancel(), (el.id, "Hello".to_owned()));
}

#[test]
fn enter_commits_shift_enter_continues() {
    assert_eq!(TextEditSession::key(&Key::new("Enter"), Modifiers::default()), EditKey::Commit);
    assert_eq!(TextEditSession::key(&Key::new("Enter"), Modifiers::shift()), EditKey::Continue);
    let ctrl = Modifiers { ctrl: true, ..Default::default() };
    assert_eq!(TextEditSession::key(&Key::new("Enter"), ctrl), EditKey::Continue);
}

#[test]
fn escape_cancels() {
    assert_eq!(TextEditSession::key(&Key::new("Escape"), Modifiers::default()), EditKey::Cancel);
    assert_eq!(TextEditSession::key(&Key::new("a"), Modifiers::default()), EditKey::Continue);
}
