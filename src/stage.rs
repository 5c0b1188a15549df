//! Stage: the live node state the rendering surface shows for each element.
//!
//! During a gesture only the node moves, scales or rotates; the element in the
//! document keeps its last committed attributes until the gesture ends and the
//! transform controller folds the node state back into the element. After a
//! commit the node mirrors the element again (with unit scale, except for
//! vector paths which keep their persisted scale).

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;

use std::collections::HashMap;

use crate::doc::DocStore;
use crate::element::{Bounds, Element, ElementId};
use crate::viewport::Point;

/// Transform of one rendered node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub x: f64,
    pub y: f64,
    /// Clockwise rotation in degrees around the node origin.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl NodeState {
    /// Node state mirroring an element's committed attributes.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let (scale_x, scale_y) = element.persisted_scale();
        Self { x: element.x, y: element.y, rotation: element.rotation, scale_x, scale_y }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Map a point from the element's local (unscaled, unrotated) frame to canvas space.
    #[must_use]
    pub fn local_to_world(&self, local: Point) -> Point {
        let scaled = Point::new(self.x + local.x * self.scale_x, self.y + local.y * self.scale_y);
        scaled.rotate_around(self.origin(), self.rotation)
    }

    /// Map a canvas point into the element's local frame. `None` when a scale is degenerate.
    #[must_use]
    pub fn world_to_local(&self, world: Point) -> Option<Point> {
        if self.scale_x.abs() < f64::EPSILON || self.scale_y.abs() < f64::EPSILON {
            return None;
        }
        let unrotated = world.rotate_around(self.origin(), -self.rotation);
        Some(Point::new((unrotated.x - self.x) / self.scale_x, (unrotated.y - self.y) / self.scale_y))
    }

    /// The four corners of `local` bounds in canvas space, clockwise from top-left.
    #[must_use]
    pub fn world_corners(&self, local: &Bounds) -> [Point; 4] {
        [
            self.local_to_world(Point::new(local.x, local.y)),
            self.local_to_world(Point::new(local.right(), local.y)),
            self.local_to_world(Point::new(local.right(), local.bottom())),
            self.local_to_world(Point::new(local.x, local.bottom())),
        ]
    }

    /// Axis-aligned canvas-space bounds of the transformed `local` bounds.
    #[must_use]
    pub fn world_bounds(&self, local: &Bounds) -> Bounds {
        Bounds::enclosing(&self.world_corners(local)).unwrap_or_default()
    }
}

/// Live node states keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    nodes: HashMap<ElementId, NodeState>,
}

impl Stage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every node from the document, discarding any in-flight state.
    pub fn sync_all(&mut self, doc: &DocStore) {
        self.nodes = doc
            .elements()
            .iter()
            .map(|el| (el.id, NodeState::from_element(el)))
            .collect();
    }

    /// Reset one node to mirror its element.
    pub fn sync_element(&mut self, element: &Element) {
        self.nodes.insert(element.id, NodeState::from_element(element));
    }

    pub fn remove(&mut self, id: &ElementId) {
        self.nodes.remove(id);
    }

    #[must_use]
    pub fn node(&self, id: &ElementId) -> Option<NodeState> {
        self.nodes.get(id).copied()
    }

    /// Overwrite a node's live state. Ignored for ids the stage doesn't know.
    pub fn set_node(&mut self, id: &ElementId, state: NodeState) {
        if let Some(node) = self.nodes.get_mut(id) {
            *node = state;
        }
    }

    /// Move a node's origin.
    pub fn set_position(&mut self, id: &ElementId, pos: Point) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.x = pos.x;
            node.y = pos.y;
        }
    }

    /// Set a node's live scale back to 1×1.
    pub fn reset_scale(&mut self, id: &ElementId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.scale_x = 1.0;
            node.scale_y = 1.0;
        }
    }

    /// Canvas-space axis-aligned bounds of an element as currently rendered.
    #[must_use]
    pub fn element_bounds(&self, element: &Element) -> Bounds {
        let node = self.node(&element.id).unwrap_or_else(|| NodeState::from_element(element));
        node.world_bounds(&element.local_bounds())
    }
}
