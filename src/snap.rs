//! Smart guides: snap a dragged selection to the slide and to other elements.
//!
//! Targets are the canvas edges and center lines plus the edges and centers of
//! every element that is not moving. Each axis snaps independently to its
//! closest target within the threshold.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::doc::DocStore;
use crate::element::{Bounds, ElementId};
use crate::stage::Stage;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// A vertical line at `x = position`.
    Vertical,
    /// A horizontal line at `y = position`.
    Horizontal,
}

/// A guide line to draw while the snap is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub axis: GuideAxis,
    pub position: f64,
}

/// Candidate alignment lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapTargets {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl SnapTargets {
    /// Collect targets from the canvas and every element not in `moving`.
    #[must_use]
    pub fn collect(doc: &DocStore, stage: &Stage, moving: &[ElementId]) -> Self {
        let mut targets = Self {
            xs: vec![0.0, CANVAS_WIDTH / 2.0, CANVAS_WIDTH],
            ys: vec![0.0, CANVAS_HEIGHT / 2.0, CANVAS_HEIGHT],
        };
        for el in doc.elements().iter().filter(|el| !moving.contains(&el.id)) {
            let b = stage.element_bounds(el);
            targets.xs.extend([b.x, b.x + b.width / 2.0, b.right()]);
            targets.ys.extend([b.y, b.y + b.height / 2.0, b.bottom()]);
        }
        targets
    }
}

/// Offset to add to the dragged bounds, and the guides that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    pub dx: f64,
    pub dy: f64,
    pub guides: Vec<Guide>,
}

/// Snap `moving` to the nearest target on each axis within `threshold` logical units.
#[must_use]
pub fn snap_bounds(moving: &Bounds, targets: &SnapTargets, threshold: f64) -> SnapResult {
    let mut result = SnapResult::default();

    let features_x = [moving.x, moving.x + moving.width / 2.0, moving.right()];
    if let Some((offset, at)) = closest(&features_x, &targets.xs, threshold) {
        result.dx = offset;
        result.guides.push(Guide { axis: GuideAxis::Vertical, position: at });
    }

    let features_y = [moving.y, moving.y + moving.height / 2.0, moving.bottom()];
    if let Some((offset, at)) = closest(&features_y, &targets.ys, threshold) {
        result.dy = offset;
        result.guides.push(Guide { axis: GuideAxis::Horizontal, position: at });
    }

    result
}

/// The smallest `(target - feature, target)` pair within `threshold`.
fn closest(features: &[f64], targets: &[f64], threshold: f64) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for &f in features {
        for &t in targets {
            let offset = t - f;
            if offset.abs() > threshold {
                continue;
            }
            if best.is_none_or(|(b, _)| offset.abs() < b.abs()) {
                best = Some((offset, t));
            }
        }
    }
    best
}
