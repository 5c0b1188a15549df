//! Rendering: draws the slide to a 2D context.
//!
//! This module is the only place that draws to a [`web_sys::CanvasRenderingContext2d`].
//! It reads engine state and produces pixels; it never mutates anything.
//! Elements are drawn with their live node transform, so a gesture in
//! progress shows its scale and rotation before the commit folds them into
//! the element's attributes.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::{FRAC_PI_2, PI};

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::doc::DrawingConfig;
use crate::element::{Element, Shape, TextAlign, line_points, polygon_vertex_count, star_vertex_count};
use crate::engine::EngineCore;
use crate::hit;
use crate::snap::{Guide, GuideAxis};
use crate::stage::NodeState;
use crate::viewport::Point;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;
/// Half the side of a resize handle square, in screen pixels.
const HANDLE_HALF_PX: f64 = 5.0;
const SELECTION_COLOR: &str = "#1E90FF";
const GUIDE_COLOR: &str = "#FF3EA5";
const PLACEHOLDER_FILL: &str = "#E5E7EB";
const PLACEHOLDER_TEXT: &str = "#6B7280";

/// Whether editor chrome is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Selection outlines, handles, guides and the stroke being drawn.
    Editor,
    /// Slide content only, for raster export.
    Export,
}

/// Draw the full scene: background, elements, then (in editor mode) selection UI.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore, mode: RenderMode) -> Result<(), JsValue> {
    let zoom = core.zoom();
    let (w, h) = core.viewport.stage_size();

    // Layer 1: clear and set up the zoom transform.
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, w, h);
    ctx.scale(zoom, zoom)?;
    ctx.set_fill_style_str("#FFFFFF");
    ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);

    // Layer 2: elements in paint order, skipping the node under inline edit.
    for el in core.doc.elements() {
        if !core.is_node_visible(&el.id) {
            continue;
        }
        let node = core.node(&el.id).unwrap_or_else(|| NodeState::from_element(el));
        draw_element(ctx, el, &node)?;
    }

    if mode == RenderMode::Export {
        return Ok(());
    }

    // Layer 3: selection UI.
    for id in core.selection() {
        if !core.is_node_visible(id) {
            continue;
        }
        if let (Some(el), Some(node)) = (core.element(id), core.node(id)) {
            draw_selection_outline(ctx, el, &node, zoom)?;
        }
    }
    if let Some(id) = core.handles_target() {
        if let (Some(el), Some(node)) = (core.element(&id), core.node(&id)) {
            draw_handles(ctx, el, &node, zoom, core.config.rotate_handle_offset_px)?;
        }
    }

    draw_guides(ctx, core.guides(), zoom);
    draw_stroke_preview(ctx, core.freehand.points(), core.doc.drawing());
    Ok(())
}

// =============================================================
// Element dispatch
// =============================================================

fn draw_element(ctx: &CanvasRenderingContext2d, el: &Element, node: &NodeState) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(node.x, node.y)?;
    ctx.rotate(node.rotation.to_radians())?;
    ctx.scale(node.scale_x, node.scale_y)?;
    ctx.set_global_alpha(el.opacity.unwrap_or(1.0));
    let result = draw_shape(ctx, &el.shape);
    ctx.restore();
    result
}

/// Draw one shape in its local frame.
fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    match shape {
        Shape::Rect { width, height, corner_radius, fill, stroke, stroke_width } => {
            rounded_rect_path(ctx, *width, *height, *corner_radius)?;
            fill_and_stroke(ctx, fill, stroke, *stroke_width);
            Ok(())
        }
        Shape::Circle { radius, fill, stroke, stroke_width } => {
            ctx.begin_path();
            ctx.arc(0.0, 0.0, *radius, 0.0, 2.0 * PI)?;
            fill_and_stroke(ctx, fill, stroke, *stroke_width);
            Ok(())
        }
        Shape::Polygon { radius, sides, fill, stroke, stroke_width } => {
            let pts = polygon_points(*radius, *radius, polygon_vertex_count(*sides));
            polyline_path(ctx, &pts, true);
            fill_and_stroke(ctx, fill, stroke, *stroke_width);
            Ok(())
        }
        Shape::Star { inner_radius, outer_radius, num_points, fill, stroke, stroke_width } => {
            let pts = polygon_points(*outer_radius, *inner_radius, star_vertex_count(*num_points));
            polyline_path(ctx, &pts, true);
            fill_and_stroke(ctx, fill, stroke, *stroke_width);
            Ok(())
        }
        Shape::Line { points, stroke, stroke_width, tension } => {
            draw_smooth_line(ctx, &line_points(points), stroke, *stroke_width, *tension);
            Ok(())
        }
        Shape::Text { text, font_size, font_family, font_weight, font_style, fill, width, align, line_height } => {
            ctx.set_fill_style_str(fill);
            ctx.set_font(&format!("{font_style} {font_weight} {font_size}px {font_family}"));
            ctx.set_text_align(align.as_str());
            ctx.set_text_baseline("top");
            let x = match align {
                TextAlign::Left => 0.0,
                TextAlign::Center => width / 2.0,
                TextAlign::Right => *width,
            };
            let step = font_size * line_height;
            let mut y = (step - font_size) / 2.0;
            for line in text.split('\n') {
                ctx.fill_text(line, x, y)?;
                y += step;
            }
            Ok(())
        }
        Shape::Path { data, fill, stroke, stroke_width, .. } => {
            let path = Path2d::new_with_path_string(data)?;
            ctx.set_fill_style_str(fill);
            ctx.fill_with_path_2d(&path);
            if *stroke_width > 0.0 {
                ctx.set_stroke_style_str(stroke);
                ctx.set_line_width(*stroke_width);
                ctx.stroke_with_path(&path);
            }
            Ok(())
        }
        Shape::Image { width, height, .. } => draw_placeholder(ctx, *width, *height, "Image"),
        Shape::Video { width, height, .. } => draw_placeholder(ctx, *width, *height, "Video"),
        Shape::Audio { width, height, .. } => draw_placeholder(ctx, *width, *height, "Audio"),
        Shape::Model3d { width, height, .. } => draw_placeholder(ctx, *width, *height, "3D"),
    }
}

// =============================================================
// Shape helpers
// =============================================================

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, w: f64, h: f64, r: f64) -> Result<(), JsValue> {
    let r = r.clamp(0.0, w.min(h) / 2.0);
    ctx.begin_path();
    if r <= 0.0 {
        ctx.rect(0.0, 0.0, w, h);
        return Ok(());
    }
    ctx.move_to(r, 0.0);
    ctx.arc_to(w, 0.0, w, h, r)?;
    ctx.arc_to(w, h, 0.0, h, r)?;
    ctx.arc_to(0.0, h, 0.0, 0.0, r)?;
    ctx.arc_to(0.0, 0.0, w, 0.0, r)?;
    ctx.close_path();
    Ok(())
}

/// Vertices alternating between `r_even` and `r_odd`, starting straight up.
fn polygon_points(r_even: f64, r_odd: f64, count: u32) -> Vec<Point> {
    let step = 2.0 * PI / f64::from(count.max(1));
    (0..count)
        .map(|i| {
            let angle = step.mul_add(f64::from(i), -FRAC_PI_2);
            let r = if i % 2 == 0 { r_even } else { r_odd };
            Point::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

fn polyline_path(ctx: &CanvasRenderingContext2d, pts: &[Point], close: bool) {
    ctx.begin_path();
    for (i, p) in pts.iter().enumerate() {
        if i == 0 {
            ctx.move_to(p.x, p.y);
        } else {
            ctx.line_to(p.x, p.y);
        }
    }
    if close {
        ctx.close_path();
    }
}

fn fill_and_stroke(ctx: &CanvasRenderingContext2d, fill: &str, stroke: &str, stroke_width: f64) {
    ctx.set_fill_style_str(fill);
    ctx.fill();
    if stroke_width > 0.0 {
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(stroke_width);
        ctx.stroke();
    }
}

/// Cardinal spline through `pts`. Tension 0 draws straight segments.
fn draw_smooth_line(ctx: &CanvasRenderingContext2d, pts: &[Point], stroke: &str, width: f64, tension: f64) {
    let Some(first) = pts.first() else {
        return;
    };
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    ctx.move_to(first.x, first.y);

    let k = tension / 3.0;
    let last = pts.len() - 1;
    for i in 0..last {
        let p0 = pts[i.saturating_sub(1)];
        let p1 = pts[i];
        let p2 = pts[i + 1];
        let p3 = pts[(i + 2).min(last)];
        let c1 = Point::new(p1.x + (p2.x - p0.x) * k, p1.y + (p2.y - p0.y) * k);
        let c2 = Point::new(p2.x - (p3.x - p1.x) * k, p2.y - (p3.y - p1.y) * k);
        ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p2.x, p2.y);
    }
    ctx.stroke();
}

fn draw_placeholder(ctx: &CanvasRenderingContext2d, w: f64, h: f64, label: &str) -> Result<(), JsValue> {
    ctx.set_fill_style_str(PLACEHOLDER_FILL);
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_fill_style_str(PLACEHOLDER_TEXT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let font_size = (h * 0.3).clamp(10.0, 24.0);
    ctx.set_font(&format!("{font_size:.0}px sans-serif"));
    ctx.fill_text(label, w / 2.0, h / 2.0)
}

// =============================================================
// Selection UI
// =============================================================

fn set_dash(ctx: &CanvasRenderingContext2d, dash: Option<f64>) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    if let Some(d) = dash {
        dash_array.push(&d.into());
        dash_array.push(&d.into());
    }
    ctx.set_line_dash(&dash_array)
}

fn draw_selection_outline(
    ctx: &CanvasRenderingContext2d,
    el: &Element,
    node: &NodeState,
    zoom: f64,
) -> Result<(), JsValue> {
    let corners = node.world_corners(&el.local_bounds());
    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    set_dash(ctx, Some(SELECTION_DASH_PX / zoom))?;
    polyline_path(ctx, &corners, true);
    ctx.stroke();
    set_dash(ctx, None)?;
    ctx.restore();
    Ok(())
}

fn draw_handles(
    ctx: &CanvasRenderingContext2d,
    el: &Element,
    node: &NodeState,
    zoom: f64,
    rotate_offset_px: f64,
) -> Result<(), JsValue> {
    let half = HANDLE_HALF_PX / zoom;
    let handles = hit::resize_handle_positions(el, node);

    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);

    for (_, pos) in &handles {
        ctx.fill_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
        ctx.stroke_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
    }

    // Rotate handle, tied to the N handle.
    let rh = hit::rotate_handle_position(el, node, zoom, rotate_offset_px);
    let (_, n_handle) = handles[0];
    ctx.begin_path();
    ctx.move_to(n_handle.x, n_handle.y);
    ctx.line_to(rh.x, rh.y);
    ctx.stroke();

    ctx.begin_path();
    ctx.arc(rh.x, rh.y, half, 0.0, 2.0 * PI)?;
    ctx.fill();
    ctx.stroke();

    ctx.restore();
    Ok(())
}

fn draw_guides(ctx: &CanvasRenderingContext2d, guides: &[Guide], zoom: f64) {
    if guides.is_empty() {
        return;
    }
    ctx.save();
    ctx.set_stroke_style_str(GUIDE_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    for g in guides {
        match g.axis {
            GuideAxis::Vertical => {
                ctx.move_to(g.position, 0.0);
                ctx.line_to(g.position, CANVAS_HEIGHT);
            }
            GuideAxis::Horizontal => {
                ctx.move_to(0.0, g.position);
                ctx.line_to(CANVAS_WIDTH, g.position);
            }
        }
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_stroke_preview(ctx: &CanvasRenderingContext2d, points: &[f64], drawing: &DrawingConfig) {
    let pts = line_points(points);
    if pts.len() < 2 {
        return;
    }
    ctx.save();
    ctx.set_global_alpha(drawing.opacity);
    draw_smooth_line(ctx, &pts, &drawing.color, drawing.brush_size, 0.0);
    ctx.restore();
}
