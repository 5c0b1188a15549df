//! Element model: the typed visual primitives placed on a slide.
//!
//! An [`Element`] carries the attributes every kind shares (id, position,
//! rotation, opacity) plus a [`Shape`] holding the kind-specific geometry and
//! style. [`ElementPatch`] is the sparse update produced by gestures and
//! applied by the document store.
//!
//! Origin convention: box-like kinds, text, lines and vector paths are
//! positioned by their top-left corner. Circles, regular polygons and stars are
//! positioned by their center.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{MAX_OUTLINE_VERTICES, TEXT_LINE_HEIGHT};
use crate::viewport::Point;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// The kind of an element, without its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rect,
    Circle,
    Line,
    Text,
    Star,
    Polygon,
    Path,
    Image,
    Video,
    Audio,
    Model3d,
}

impl ElementKind {
    /// Kinds whose corner handles keep the aspect ratio while resizing.
    #[must_use]
    pub fn keeps_ratio(self) -> bool {
        matches!(self, Self::Text | Self::Circle | Self::Polygon | Self::Star)
    }
}

/// Horizontal text alignment inside a text element's bounding width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// CSS / Canvas 2D keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

fn default_fill() -> String {
    "#4F46E5".to_owned()
}

fn default_stroke() -> String {
    "#111827".to_owned()
}

fn default_text_fill() -> String {
    "#111827".to_owned()
}

fn default_font_family() -> String {
    "Inter, sans-serif".to_owned()
}

fn default_normal() -> String {
    "normal".to_owned()
}

fn default_line_height() -> f64 {
    TEXT_LINE_HEIGHT
}

fn default_one() -> f64 {
    1.0
}

/// Kind-specific geometry and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Rect {
        width: f64,
        height: f64,
        #[serde(default)]
        corner_radius: f64,
        #[serde(default = "default_fill")]
        fill: String,
        #[serde(default = "default_stroke")]
        stroke: String,
        #[serde(default)]
        stroke_width: f64,
    },
    Circle {
        radius: f64,
        #[serde(default = "default_fill")]
        fill: String,
        #[serde(default = "default_stroke")]
        stroke: String,
        #[serde(default)]
        stroke_width: f64,
    },
    /// Polyline or freehand stroke. `points` is `[x0, y0, x1, y1, ...]` relative to the element position.
    Line {
        points: Vec<f64>,
        #[serde(default = "default_stroke")]
        stroke: String,
        #[serde(default = "default_one")]
        stroke_width: f64,
        #[serde(default)]
        tension: f64,
    },
    Text {
        text: String,
        font_size: f64,
        #[serde(default = "default_font_family")]
        font_family: String,
        #[serde(default = "default_normal")]
        font_weight: String,
        #[serde(default = "default_normal")]
        font_style: String,
        #[serde(default = "default_text_fill")]
        fill: String,
        width: f64,
        #[serde(default)]
        align: TextAlign,
        #[serde(default = "default_line_height")]
        line_height: f64,
    },
    Star {
        inner_radius: f64,
        outer_radius: f64,
        num_points: u32,
        #[serde(default = "default_fill")]
        fill: String,
        #[serde(default = "default_stroke")]
        stroke: String,
        #[serde(default)]
        stroke_width: f64,
    },
    /// Regular polygon inscribed in a circle of `radius`.
    Polygon {
        radius: f64,
        sides: u32,
        #[serde(default = "default_fill")]
        fill: String,
        #[serde(default = "default_stroke")]
        stroke: String,
        #[serde(default)]
        stroke_width: f64,
    },
    /// Vector path. `width`/`height` are the natural size of the outline; the
    /// persisted scale is applied on top and never baked into `data`.
    Path {
        data: String,
        width: f64,
        height: f64,
        #[serde(default = "default_fill")]
        fill: String,
        #[serde(default = "default_stroke")]
        stroke: String,
        #[serde(default)]
        stroke_width: f64,
        #[serde(default = "default_one")]
        scale_x: f64,
        #[serde(default = "default_one")]
        scale_y: f64,
    },
    Image {
        width: f64,
        height: f64,
        src: String,
        #[serde(default)]
        corner_radius: f64,
    },
    Video {
        width: f64,
        height: f64,
        src: String,
    },
    Audio {
        width: f64,
        height: f64,
        src: String,
    },
    Model3d {
        width: f64,
        height: f64,
        src: String,
    },
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Rect { .. } => ElementKind::Rect,
            Self::Circle { .. } => ElementKind::Circle,
            Self::Line { .. } => ElementKind::Line,
            Self::Text { .. } => ElementKind::Text,
            Self::Star { .. } => ElementKind::Star,
            Self::Polygon { .. } => ElementKind::Polygon,
            Self::Path { .. } => ElementKind::Path,
            Self::Image { .. } => ElementKind::Image,
            Self::Video { .. } => ElementKind::Video,
            Self::Audio { .. } => ElementKind::Audio,
            Self::Model3d { .. } => ElementKind::Model3d,
        }
    }
}

/// Axis-aligned rectangle in some local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Bounds {
        Bounds::new(self.x - margin, self.y - margin, self.width + margin * 2.0, self.height + margin * 2.0)
    }

    /// Smallest bounds containing both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// Smallest bounds containing every point.
    #[must_use]
    pub fn enclosing(points: &[Point]) -> Option<Bounds> {
        let first = points.first()?;
        let mut out = Bounds::new(first.x, first.y, 0.0, 0.0);
        for p in &points[1..] {
            out = out.union(&Bounds::new(p.x, p.y, 0.0, 0.0));
        }
        Some(out)
    }
}

/// An element as stored in the slide document and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier within the slide.
    pub id: ElementId,
    /// Position in logical canvas units (see the module docs for the origin convention).
    pub x: f64,
    pub y: f64,
    /// Clockwise rotation in degrees around the element origin.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in `[0, 1]`. Absent means fully opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Kind-specific attributes.
    #[serde(flatten)]
    pub shape: Shape,
}

impl Element {
    /// Create an element with a fresh id.
    #[must_use]
    pub fn new(x: f64, y: f64, shape: Shape) -> Self {
        Self { id: Uuid::new_v4(), x, y, rotation: 0.0, opacity: None, shape }
    }

    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            x,
            y,
            Shape::Rect {
                width,
                height,
                corner_radius: 0.0,
                fill: default_fill(),
                stroke: default_stroke(),
                stroke_width: 0.0,
            },
        )
    }

    #[must_use]
    pub fn circle(cx: f64, cy: f64, radius: f64) -> Self {
        Self::new(cx, cy, Shape::Circle { radius, fill: default_fill(), stroke: default_stroke(), stroke_width: 0.0 })
    }

    #[must_use]
    pub fn polygon(cx: f64, cy: f64, radius: f64, sides: u32) -> Self {
        Self::new(
            cx,
            cy,
            Shape::Polygon { radius, sides: sides.max(3), fill: default_fill(), stroke: default_stroke(), stroke_width: 0.0 },
        )
    }

    #[must_use]
    pub fn star(cx: f64, cy: f64, inner_radius: f64, outer_radius: f64, num_points: u32) -> Self {
        Self::new(
            cx,
            cy,
            Shape::Star {
                inner_radius,
                outer_radius,
                num_points: num_points.max(2),
                fill: default_fill(),
                stroke: default_stroke(),
                stroke_width: 0.0,
            },
        )
    }

    #[must_use]
    pub fn text(x: f64, y: f64, text: &str, font_size: f64, width: f64) -> Self {
        Self::new(
            x,
            y,
            Shape::Text {
                text: text.to_owned(),
                font_size,
                font_family: default_font_family(),
                font_weight: default_normal(),
                font_style: default_normal(),
                fill: default_text_fill(),
                width,
                align: TextAlign::Left,
                line_height: TEXT_LINE_HEIGHT,
            },
        )
    }

    #[must_use]
    pub fn line(points: Vec<f64>, stroke: &str, stroke_width: f64, tension: f64) -> Self {
        Self::new(0.0, 0.0, Shape::Line { points, stroke: stroke.to_owned(), stroke_width, tension })
    }

    #[must_use]
    pub fn path(x: f64, y: f64, data: &str, width: f64, height: f64) -> Self {
        Self::new(
            x,
            y,
            Shape::Path {
                data: data.to_owned(),
                width,
                height,
                fill: default_fill(),
                stroke: default_stroke(),
                stroke_width: 0.0,
                scale_x: 1.0,
                scale_y: 1.0,
            },
        )
    }

    #[must_use]
    pub fn image(x: f64, y: f64, width: f64, height: f64, src: &str) -> Self {
        Self::new(x, y, Shape::Image { width, height, src: src.to_owned(), corner_radius: 0.0 })
    }

    #[must_use]
    pub fn video(x: f64, y: f64, width: f64, height: f64, src: &str) -> Self {
        Self::new(x, y, Shape::Video { width, height, src: src.to_owned() })
    }

    #[must_use]
    pub fn audio(x: f64, y: f64, width: f64, height: f64, src: &str) -> Self {
        Self::new(x, y, Shape::Audio { width, height, src: src.to_owned() })
    }

    #[must_use]
    pub fn model3d(x: f64, y: f64, width: f64, height: f64, src: &str) -> Self {
        Self::new(x, y, Shape::Model3d { width, height, src: src.to_owned() })
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Scale persisted on the element itself. Only vector paths carry one.
    #[must_use]
    pub fn persisted_scale(&self) -> (f64, f64) {
        match &self.shape {
            Shape::Path { scale_x, scale_y, .. } => (*scale_x, *scale_y),
            _ => (1.0, 1.0),
        }
    }

    /// Bounds in the element's unrotated, unscaled local frame (origin at `x`, `y`).
    #[must_use]
    pub fn local_bounds(&self) -> Bounds {
        match &self.shape {
            Shape::Rect { width, height, .. }
            | Shape::Image { width, height, .. }
            | Shape::Video { width, height, .. }
            | Shape::Audio { width, height, .. }
            | Shape::Model3d { width, height, .. }
            | Shape::Path { width, height, .. } => Bounds::new(0.0, 0.0, *width, *height),
            Shape::Circle { radius, .. } | Shape::Polygon { radius, .. } => {
                Bounds::new(-radius, -radius, radius * 2.0, radius * 2.0)
            }
            Shape::Star { outer_radius, .. } => {
                Bounds::new(-outer_radius, -outer_radius, outer_radius * 2.0, outer_radius * 2.0)
            }
            Shape::Text { text, font_size, width, line_height, .. } => {
                Bounds::new(0.0, 0.0, *width, text_block_height(text, *font_size, *line_height))
            }
            Shape::Line { points, stroke_width, .. } => {
                let pts = line_points(points);
                Bounds::enclosing(&pts).unwrap_or_default().inflate(stroke_width / 2.0)
            }
        }
    }

    /// Apply a sparse update. Fields that do not exist on this kind are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(o) = patch.opacity {
            self.opacity = Some(o.clamp(0.0, 1.0));
        }

        match &mut self.shape {
            Shape::Rect { width, height, .. }
            | Shape::Image { width, height, .. }
            | Shape::Video { width, height, .. }
            | Shape::Audio { width, height, .. }
            | Shape::Model3d { width, height, .. } => {
                set_if(width, patch.width);
                set_if(height, patch.height);
            }
            Shape::Circle { radius, .. } | Shape::Polygon { radius, .. } => set_if(radius, patch.radius),
            Shape::Star { inner_radius, outer_radius, .. } => {
                set_if(inner_radius, patch.inner_radius);
                set_if(outer_radius, patch.outer_radius);
            }
            Shape::Text { text, font_size, width, .. } => {
                set_if(font_size, patch.font_size);
                set_if(width, patch.width);
                if let Some(t) = &patch.text {
                    text.clone_from(t);
                }
            }
            Shape::Line { points, .. } => {
                if let Some(p) = &patch.points {
                    points.clone_from(p);
                }
            }
            Shape::Path { scale_x, scale_y, .. } => {
                set_if(scale_x, patch.scale_x);
                set_if(scale_y, patch.scale_y);
            }
        }
    }
}

fn set_if(slot: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Outline vertices of a regular polygon, clamped to what can be drawn.
#[must_use]
pub fn polygon_vertex_count(sides: u32) -> u32 {
    sides.clamp(3, MAX_OUTLINE_VERTICES)
}

/// Outline vertices of a star: an outer and an inner point per star point.
#[must_use]
pub fn star_vertex_count(num_points: u32) -> u32 {
    num_points.clamp(2, MAX_OUTLINE_VERTICES / 2) * 2
}

/// Height of a text block: one line box per explicit line.
#[must_use]
pub fn text_block_height(text: &str, font_size: f64, line_height: f64) -> f64 {
    let lines = text.split('\n').count().max(1);
    #[allow(clippy::cast_precision_loss)]
    let lines = lines as f64;
    font_size * line_height * lines
}

/// Pair up a flat `[x0, y0, x1, y1, ...]` list. A trailing odd coordinate is ignored.
#[must_use]
pub fn line_points(flat: &[f64]) -> Vec<Point> {
    flat.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    /// Persisted scale; only meaningful for vector paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
}

impl ElementPatch {
    /// A patch that only moves and rotates.
    #[must_use]
    pub fn placement(x: f64, y: f64, rotation: f64) -> Self {
        Self { x: Some(x), y: Some(y), rotation: Some(rotation), ..Default::default() }
    }
}
