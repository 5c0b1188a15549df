//! Hit-testing: which element (or which handle of the selected element) is under a point.
//!
//! Handles of the single selected element are tested first, then element
//! bodies from front to back. All tests run in logical canvas space; handle
//! slop is a screen distance converted through the current zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::DocStore;
use crate::element::{Element, ElementId, Shape, line_points};
use crate::stage::{NodeState, Stage};
use crate::viewport::Point;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// All anchors, clockwise from the top edge.
    pub const ALL: [ResizeAnchor; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Horizontal direction the handle pulls: -1 west, 0 none, 1 east.
    #[must_use]
    pub fn x_dir(self) -> f64 {
        match self {
            Self::Ne | Self::E | Self::Se => 1.0,
            Self::Nw | Self::W | Self::Sw => -1.0,
            Self::N | Self::S => 0.0,
        }
    }

    /// Vertical direction the handle pulls: -1 north, 0 none, 1 south.
    #[must_use]
    pub fn y_dir(self) -> f64 {
        match self {
            Self::Se | Self::S | Self::Sw => 1.0,
            Self::Ne | Self::N | Self::Nw => -1.0,
            Self::E | Self::W => 0.0,
        }
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// CSS cursor for hovering this handle on an unrotated element.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Inputs that shape a hit test beyond the document itself.
#[derive(Debug, Clone, Copy)]
pub struct HitOptions {
    /// Current zoom, for converting screen slop to logical units.
    pub zoom: f64,
    /// Handle hit radius in screen pixels.
    pub handle_radius_px: f64,
    /// Rotate handle distance above the top edge, in screen pixels.
    pub rotate_handle_offset_px: f64,
    /// Element whose handles are active, if exactly one is selected.
    pub selected: Option<ElementId>,
    /// Element whose node is hidden (under inline edit); never hittable.
    pub hidden: Option<ElementId>,
}

/// Canvas-space positions of the eight resize handles, in [`ResizeAnchor::ALL`] order.
#[must_use]
pub fn resize_handle_positions(element: &Element, node: &NodeState) -> [(ResizeAnchor, Point); 8] {
    let b = element.local_bounds();
    let cx = b.x + b.width / 2.0;
    let cy = b.y + b.height / 2.0;
    ResizeAnchor::ALL.map(|anchor| {
        let lx = match anchor.x_dir() {
            d if d > 0.0 => b.right(),
            d if d < 0.0 => b.x,
            _ => cx,
        };
        let ly = match anchor.y_dir() {
            d if d > 0.0 => b.bottom(),
            d if d < 0.0 => b.y,
            _ => cy,
        };
        (anchor, node.local_to_world(Point::new(lx, ly)))
    })
}

/// Canvas-space position of the rotate handle, a fixed screen distance above the top-edge midpoint.
#[must_use]
pub fn rotate_handle_position(element: &Element, node: &NodeState, zoom: f64, offset_px: f64) -> Point {
    let b = element.local_bounds();
    let top_mid = node.local_to_world(Point::new(b.x + b.width / 2.0, b.y));
    let offset = offset_px / zoom;
    // Straight up in the node's rotated frame.
    let (sin, cos) = node.rotation.to_radians().sin_cos();
    let up = if node.scale_y < 0.0 { -offset } else { offset };
    Point::new(top_mid.x + up * sin, top_mid.y - up * cos)
}

/// Canvas-space center of the element's rendered bounds, the pivot for rotation.
#[must_use]
pub fn visual_center(element: &Element, node: &NodeState) -> Point {
    node.local_to_world(element.local_bounds().center())
}

/// Test which element (if any) is under `pt`, checking selected-element handles first.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore, stage: &Stage, opts: &HitOptions) -> Option<Hit> {
    let slop = opts.handle_radius_px / opts.zoom;

    if let Some(sel_id) = opts.selected.filter(|id| Some(*id) != opts.hidden) {
        if let (Some(el), Some(node)) = (doc.get(&sel_id), stage.node(&sel_id)) {
            let rh = rotate_handle_position(el, &node, opts.zoom, opts.rotate_handle_offset_px);
            if pt.distance(rh) <= slop {
                return Some(Hit { element_id: sel_id, part: HitPart::RotateHandle });
            }
            for (anchor, pos) in resize_handle_positions(el, &node) {
                if pt.distance(pos) <= slop {
                    return Some(Hit { element_id: sel_id, part: HitPart::ResizeHandle(anchor) });
                }
            }
        }
    }

    doc.elements()
        .iter()
        .rev()
        .filter(|el| Some(el.id) != opts.hidden)
        .find(|el| {
            let node = stage.node(&el.id).unwrap_or_else(|| NodeState::from_element(el));
            body_contains(el, &node, pt, slop)
        })
        .map(|el| Hit { element_id: el.id, part: HitPart::Body })
}

/// Whether `pt` (canvas space) lies on the element's body.
#[must_use]
pub fn body_contains(element: &Element, node: &NodeState, pt: Point, slop: f64) -> bool {
    let Some(local) = node.world_to_local(pt) else {
        return false;
    };
    match &element.shape {
        Shape::Circle { radius, .. } => local.x.hypot(local.y) <= *radius,
        Shape::Line { points, stroke_width, .. } => {
            // Thin strokes get the screen slop in addition to half the stroke width.
            let scale = node.scale_x.abs().min(node.scale_y.abs()).max(f64::EPSILON);
            let reach = stroke_width / 2.0 + slop / scale;
            let pts = line_points(points);
            pts.windows(2)
                .any(|seg| distance_to_segment(local, seg[0], seg[1]) <= reach)
        }
        _ => element.local_bounds().contains(local),
    }
}

/// Distance from `p` to the segment from `a` to `b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
