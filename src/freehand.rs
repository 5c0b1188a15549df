//! Freehand drawing capture.
//!
//! While drawing mode is enabled, a pointer-down starts a stroke, every
//! pointer-move appends a logical point, and pointer-up commits the stroke as
//! a new `line` element when it holds more than one point.

#[cfg(test)]
#[path = "freehand_test.rs"]
mod freehand_test;

use crate::consts::FREEHAND_TENSION;
use crate::doc::DrawingConfig;
use crate::element::Element;
use crate::viewport::Point;

/// Stroke capture state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FreehandCapture {
    #[default]
    Idle,
    /// Flat `[x0, y0, x1, y1, ...]` list in logical units.
    Capturing { points: Vec<f64> },
}

impl FreehandCapture {
    /// Start a stroke at `logical`, replacing any stroke in progress.
    pub fn begin(&mut self, logical: Point) {
        *self = Self::Capturing { points: vec![logical.x, logical.y] };
    }

    /// Append a point. Returns `false` when no stroke is in progress.
    pub fn extend(&mut self, logical: Point) -> bool {
        match self {
            Self::Capturing { points } => {
                points.extend([logical.x, logical.y]);
                true
            }
            Self::Idle => false,
        }
    }

    /// End the stroke. Returns the new line element, or `None` when the stroke
    /// had a single point or no stroke was in progress.
    pub fn finish(&mut self, drawing: &DrawingConfig) -> Option<Element> {
        let Self::Capturing { points } = std::mem::take(self) else {
            return None;
        };
        if points.len() <= 2 {
            tracing::debug!(points = points.len() / 2, "freehand stroke discarded");
            return None;
        }
        let mut element = Element::line(points, &drawing.color, drawing.brush_size, FREEHAND_TENSION);
        element.opacity = Some(drawing.opacity.clamp(0.0, 1.0));
        Some(element)
    }

    /// Drop the stroke without committing.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing { .. })
    }

    /// Points captured so far.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        match self {
            Self::Capturing { points } => points,
            Self::Idle => &[],
        }
    }
}
