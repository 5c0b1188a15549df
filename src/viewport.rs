//! Viewport: the zoom scalar and the screen/logical coordinate mapping.
//!
//! Pointer positions arrive in stage-relative screen pixels (the canvas
//! element's top-left is the origin). The logical slide is a fixed
//! 960×540 space scaled uniformly by `zoom`; there is no pan.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, ZOOM_MAX, ZOOM_MIN};

/// A point in either screen or logical space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate this point around `center` by `degrees` (clockwise in screen space).
    #[must_use]
    pub fn rotate_around(self, center: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Where the current zoom value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomSource {
    /// Never set, or explicitly reset to 1×.
    #[default]
    Default,
    /// Computed by [`Viewport::fit_to_container`]. Stays fit-eligible only at 1×.
    Fit,
    /// Chosen by the user. Resize never overrides it.
    Manual,
}

/// Zoom state for the fixed-size slide canvas.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    zoom: f64,
    source: ZoomSource,
    /// Page-space position of the stage's top-left corner, in CSS pixels.
    pub stage_offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, source: ZoomSource::Default, stage_offset: Point::default() }
    }
}

impl Viewport {
    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn source(&self) -> ZoomSource {
        self.source
    }

    /// Set a manual zoom, clamped to the supported range. Returns the applied value.
    ///
    /// Setting exactly 1× returns the viewport to the default state, which makes
    /// it eligible for fit-to-container again.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        #[allow(clippy::float_cmp)]
        let is_default = self.zoom == 1.0;
        self.source = if is_default { ZoomSource::Default } else { ZoomSource::Manual };
        self.zoom
    }

    /// Recompute the zoom for a resized container while the zoom is still at 1×.
    ///
    /// A manual zoom is never overridden, and neither is an earlier fit that
    /// landed below 1×. Returns the new zoom when it was recomputed.
    pub fn fit_to_container(&mut self, width: f64, height: f64, padding: f64) -> Option<f64> {
        #[allow(clippy::float_cmp)]
        let at_default = self.zoom == 1.0;
        if self.source == ZoomSource::Manual || !at_default {
            return None;
        }
        self.zoom = fit_scale(width, height, padding);
        self.source = ZoomSource::Fit;
        Some(self.zoom)
    }

    /// Convert a stage-relative screen point to logical canvas coordinates.
    #[must_use]
    pub fn screen_to_logical(&self, screen: Point) -> Point {
        Point { x: screen.x / self.zoom, y: screen.y / self.zoom }
    }

    /// Convert a logical canvas point to stage-relative screen coordinates.
    #[must_use]
    pub fn logical_to_screen(&self, logical: Point) -> Point {
        Point { x: logical.x * self.zoom, y: logical.y * self.zoom }
    }

    /// Convert a logical canvas point to page coordinates, including the stage offset.
    #[must_use]
    pub fn logical_to_page(&self, logical: Point) -> Point {
        let screen = self.logical_to_screen(logical);
        Point { x: self.stage_offset.x + screen.x, y: self.stage_offset.y + screen.y }
    }

    /// Convert a screen-space distance (pixels) to logical distance.
    #[must_use]
    pub fn screen_dist_to_logical(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// On-screen size of the whole slide at the current zoom.
    #[must_use]
    pub fn stage_size(&self) -> (f64, f64) {
        (CANVAS_WIDTH * self.zoom, CANVAS_HEIGHT * self.zoom)
    }
}

/// Largest zoom (capped at 1×) at which the slide fits the container minus padding.
#[must_use]
pub fn fit_scale(width: f64, height: f64, padding: f64) -> f64 {
    let sx = (width - padding) / CANVAS_WIDTH;
    let sy = (height - padding) / CANVAS_HEIGHT;
    sx.min(sy).min(1.0).max(ZOOM_MIN)
}
