//! Selection & transform controller.
//!
//! A gesture only changes the live [`NodeState`] on the stage. When the
//! gesture ends, the controller folds that node state back into the element:
//! position and rotation are copied verbatim, and the raw scale factors are
//! reinterpreted per kind so that the element's semantic attributes (width,
//! radius, font size, ...) stay the single source of truth. Vector paths are
//! the one exception: their scale is persisted as-is and the node keeps it.
//!
//! This module also holds the live gesture math that produces those scale
//! factors from handle drags.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::{
    FONT_SIZE_MAX, FONT_SIZE_MIN, MIN_BOX_SIZE, MIN_LIVE_SCALE, MIN_RADIUS, MIN_STAR_INNER_RADIUS,
};
use crate::doc::DocStore;
use crate::element::{Element, ElementId, ElementPatch, Shape};
use crate::hit::ResizeAnchor;
use crate::stage::{NodeState, Stage};
use crate::viewport::Point;

/// The attribute update for one element, and whether its node scale returns to 1×1.
#[derive(Debug, Clone, PartialEq)]
pub struct Reinterpretation {
    pub patch: ElementPatch,
    pub reset_scale: bool,
}

/// Translate a node's end-of-gesture state into an element update.
#[must_use]
pub fn reinterpret(element: &Element, node: &NodeState) -> Reinterpretation {
    let mut patch = ElementPatch::placement(node.x, node.y, node.rotation);
    let sx = node.scale_x;
    let sy = node.scale_y;

    let reset_scale = match &element.shape {
        Shape::Text { font_size, width, .. } => {
            patch.font_size = Some((font_size * sy).round().clamp(FONT_SIZE_MIN, FONT_SIZE_MAX));
            patch.width = Some((width * sx).max(MIN_BOX_SIZE));
            true
        }
        Shape::Rect { width, height, .. }
        | Shape::Image { width, height, .. }
        | Shape::Video { width, height, .. }
        | Shape::Model3d { width, height, .. } => {
            patch.width = Some((width * sx).max(MIN_BOX_SIZE));
            patch.height = Some((height * sy).max(MIN_BOX_SIZE));
            true
        }
        Shape::Circle { radius, .. } | Shape::Polygon { radius, .. } => {
            let factor = sx.max(sy);
            patch.radius = Some((radius * factor).max(MIN_RADIUS));
            true
        }
        Shape::Star { inner_radius, outer_radius, .. } => {
            let factor = sx.max(sy);
            patch.inner_radius = Some((inner_radius * factor).max(MIN_STAR_INNER_RADIUS));
            patch.outer_radius = Some((outer_radius * factor).max(MIN_RADIUS));
            true
        }
        Shape::Path { .. } => {
            patch.scale_x = Some(sx);
            patch.scale_y = Some(sy);
            false
        }
        Shape::Line { points, .. } => {
            patch.points = Some(
                points
                    .chunks_exact(2)
                    .flat_map(|c| [c[0] * sx, c[1] * sy])
                    .collect(),
            );
            true
        }
        // Fixed-size player chip: placement only.
        Shape::Audio { .. } => true,
    };

    Reinterpretation { patch, reset_scale }
}

/// Commit the end of a resize/rotate gesture on one element.
///
/// Returns the applied patch, or `None` when the element (or its node) no
/// longer exists, in which case nothing changes.
pub fn commit_transform_end(doc: &mut DocStore, stage: &mut Stage, id: &ElementId) -> Option<ElementPatch> {
    let (Some(element), Some(node)) = (doc.get(id), stage.node(id)) else {
        tracing::debug!(%id, "transform end for missing element; dropped");
        return None;
    };
    let kind = element.kind();
    let result = reinterpret(element, &node);
    doc.update_element(id, &result.patch);
    if result.reset_scale {
        stage.reset_scale(id);
    }
    tracing::debug!(%id, ?kind, reset_scale = result.reset_scale, "transform committed");
    Some(result.patch)
}

/// Commit transform end for every id, each reinterpreted independently against its own node.
pub fn commit_transform_end_all(
    doc: &mut DocStore,
    stage: &mut Stage,
    ids: &[ElementId],
) -> Vec<(ElementId, ElementPatch)> {
    ids.iter()
        .filter_map(|id| commit_transform_end(doc, stage, id).map(|patch| (*id, patch)))
        .collect()
}

/// Commit the end of a drag: placement only, dimensions untouched.
pub fn commit_drag_end(doc: &mut DocStore, stage: &Stage, id: &ElementId) -> Option<ElementPatch> {
    let node = stage.node(id)?;
    let patch = ElementPatch::placement(node.x, node.y, node.rotation);
    if !doc.update_element(id, &patch) {
        tracing::debug!(%id, "drag end for missing element; dropped");
        return None;
    }
    Some(patch)
}

// =============================================================
// Live gesture math
// =============================================================

/// Node state while a resize handle is dragged from `start` to `current` (canvas space).
///
/// The edge or corner opposite the handle stays fixed in the node's rotated
/// frame. With `keep_ratio`, corner handles scale both axes by the same factor.
#[must_use]
pub fn resize_node(
    element: &Element,
    orig: &NodeState,
    anchor: ResizeAnchor,
    start: Point,
    current: Point,
    keep_ratio: bool,
) -> NodeState {
    let b = element.local_bounds();
    if b.width <= f64::EPSILON || b.height <= f64::EPSILON {
        return *orig;
    }

    // Pointer delta expressed along the node's own axes.
    let delta = Point::new(current.x - start.x, current.y - start.y).rotate_around(Point::default(), -orig.rotation);

    let xd = anchor.x_dir();
    let yd = anchor.y_dir();
    let mut sx = orig.scale_x;
    let mut sy = orig.scale_y;
    if xd != 0.0 {
        sx = ((orig.scale_x * b.width + xd * delta.x) / b.width).max(MIN_LIVE_SCALE);
    }
    if yd != 0.0 {
        sy = ((orig.scale_y * b.height + yd * delta.y) / b.height).max(MIN_LIVE_SCALE);
    }
    if keep_ratio && anchor.is_corner() {
        let factor = (sx / orig.scale_x).max(sy / orig.scale_y);
        sx = (orig.scale_x * factor).max(MIN_LIVE_SCALE);
        sy = (orig.scale_y * factor).max(MIN_LIVE_SCALE);
    }

    // Local point that must not move: the side opposite the dragged handle.
    let fixed = Point::new(
        match xd {
            d if d > 0.0 => b.x,
            d if d < 0.0 => b.right(),
            _ => b.x + b.width / 2.0,
        },
        match yd {
            d if d > 0.0 => b.y,
            d if d < 0.0 => b.bottom(),
            _ => b.y + b.height / 2.0,
        },
    );
    let shift = Point::new(fixed.x * (orig.scale_x - sx), fixed.y * (orig.scale_y - sy))
        .rotate_around(Point::default(), orig.rotation);

    NodeState { x: orig.x + shift.x, y: orig.y + shift.y, rotation: orig.rotation, scale_x: sx, scale_y: sy }
}

/// Node state while the rotate handle is dragged from `start` to `current` around `center`.
///
/// `snap_deg` rounds the resulting rotation to a multiple of that step. The
/// node origin moves so that `center` stays put.
#[must_use]
pub fn rotate_node(
    element: &Element,
    orig: &NodeState,
    center: Point,
    start: Point,
    current: Point,
    snap_deg: Option<f64>,
) -> NodeState {
    let start_angle = (start.y - center.y).atan2(start.x - center.x).to_degrees();
    let angle = (current.y - center.y).atan2(current.x - center.x).to_degrees();
    let mut rotation = normalize_degrees(orig.rotation + angle - start_angle);
    if let Some(step) = snap_deg.filter(|s| *s > 0.0) {
        rotation = normalize_degrees((rotation / step).round() * step);
    }

    let c_local = element.local_bounds().center();
    let offset = Point::new(c_local.x * orig.scale_x, c_local.y * orig.scale_y).rotate_around(Point::default(), rotation);

    NodeState { x: center.x - offset.x, y: center.y - offset.y, rotation, ..*orig }
}

/// Wrap an angle into `(-180, 180]`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}
