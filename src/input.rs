//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Modifiers` captures the user's intent at the time of a pointer event.
//! `InputState` is the selection gesture being tracked between pointer-down
//! and pointer-up, carrying the context needed to compute live node states
//! and emit the committed element updates on release. Freehand strokes keep
//! their own state in [`crate::freehand::FreehandCapture`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::hit::ResizeAnchor;
use crate::snap::Guide;
use crate::stage::NodeState;
use crate::viewport::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Shift only.
    #[must_use]
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Whether any of ctrl, alt or meta is held.
    #[must_use]
    pub fn has_command(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Enter"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }

    /// Unit nudge direction for arrow keys.
    #[must_use]
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self.0.as_str() {
            "ArrowLeft" => Some((-1.0, 0.0)),
            "ArrowRight" => Some((1.0, 0.0)),
            "ArrowUp" => Some((0.0, -1.0)),
            "ArrowDown" => Some((0.0, 1.0)),
            _ => None,
        }
    }
}

/// Transient UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Smart guides active during the current drag.
    pub guides: Vec<Guide>,
    /// Last cursor sent to the host, to avoid repeating `SetCursor`.
    pub cursor: String,
}

/// Internal state for the selection gesture state machine.
///
/// Each active variant carries gesture context needed to compute live node
/// states and emit final actions on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving the selected elements across the canvas.
    DraggingSelection {
        /// Logical pointer position at pointer-down.
        start_world: Point,
        /// Node origin of every dragged element at pointer-down.
        origins: Vec<(ElementId, Point)>,
        /// Whether the pointer moved since pointer-down.
        moved: bool,
    },
    /// The user is resizing the single selected element by one of its eight handles.
    Resizing {
        /// Id of the element being resized.
        id: ElementId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// Logical pointer position at the start of the resize.
        start_world: Point,
        /// Node state at the start of the resize.
        orig: NodeState,
        /// Corner handles scale both axes together.
        keep_ratio: bool,
    },
    /// The user is rotating the single selected element by its rotate handle.
    Rotating {
        /// Id of the element being rotated.
        id: ElementId,
        /// Visual center of the element; the rotation pivot.
        center: Point,
        /// Logical pointer position at the start of the rotation.
        start_world: Point,
        /// Node state at the start of the rotation.
        orig: NodeState,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
