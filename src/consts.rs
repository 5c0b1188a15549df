//! Shared numeric constants for the canvas crate.

// ── Logical canvas ──────────────────────────────────────────────

/// Width of the logical slide canvas.
pub const CANVAS_WIDTH: f64 = 960.0;

/// Height of the logical slide canvas.
pub const CANVAS_HEIGHT: f64 = 540.0;

// ── Attribute floors ────────────────────────────────────────────

/// Smallest width/height a box-like element (or text box width) may shrink to.
pub const MIN_BOX_SIZE: f64 = 20.0;

/// Smallest radius for circles and regular polygons. Also the star outer radius floor.
pub const MIN_RADIUS: f64 = 10.0;

/// Smallest inner radius for stars.
pub const MIN_STAR_INNER_RADIUS: f64 = 5.0;

/// Font size bounds applied after a text transform.
pub const FONT_SIZE_MIN: f64 = 8.0;
pub const FONT_SIZE_MAX: f64 = 200.0;

/// Live node scale never collapses below this while a handle is dragged.
pub const MIN_LIVE_SCALE: f64 = 0.01;

/// Upper bound on the outline vertices drawn for a polygon or star.
pub const MAX_OUTLINE_VERTICES: u32 = 256;

// ── Freehand ────────────────────────────────────────────────────

/// Smoothing tension stored on every committed freehand stroke.
pub const FREEHAND_TENSION: f64 = 0.5;

// ── Zoom ────────────────────────────────────────────────────────

pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 4.0;

// ── Hit-testing and handles ─────────────────────────────────────

/// Screen-space hit slop in pixels for handles and thin strokes.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Screen-space distance within which a dragged edge snaps to a guide.
pub const SNAP_THRESHOLD_PX: f64 = 6.0;

/// Rotation step used when shift is held on the rotate handle.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

/// Padding subtracted from the container before fitting the canvas.
pub const FIT_PADDING_PX: f64 = 40.0;

/// Arrow-key nudge distances in logical units.
pub const NUDGE_STEP: f64 = 1.0;
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Default line height multiplier for text elements.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;
