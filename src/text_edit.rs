//! Inline text editing.
//!
//! A [`TextEditSession`] exists for exactly as long as a text element is being
//! edited. While it exists the engine hides that element's node and the
//! selection handles; every way of ending the session (commit, cancel, or
//! simply dropping it) restores them, because visibility is derived from the
//! session's presence rather than toggled by hand.
//!
//! The session also computes the [`TextOverlay`] the host uses to position a
//! native text input over the canvas.

#[cfg(test)]
#[path = "text_edit_test.rs"]
mod text_edit_test;

use serde::Serialize;

use crate::element::{Element, ElementId, Shape, TextAlign};
use crate::input::{Key, Modifiers};
use crate::viewport::{Point, Viewport};

/// Placement and style for the native text input, in page pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub element_id: ElementId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size_px: f64,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
    pub color: String,
    pub align: TextAlign,
    pub line_height: f64,
    /// Clockwise rotation in degrees, applied around the overlay's top-left corner.
    pub rotation: f64,
    pub text: String,
}

impl TextOverlay {
    /// Overlay for `element`, or `None` if it is not a text element.
    #[must_use]
    pub fn for_element(element: &Element, viewport: &Viewport) -> Option<Self> {
        let Shape::Text { text, font_size, font_family, font_weight, font_style, fill, width, align, line_height } =
            &element.shape
        else {
            return None;
        };
        let zoom = viewport.zoom();
        let page = viewport.logical_to_page(Point::new(element.x, element.y));
        let font_size_px = font_size * zoom;
        let lines = text.split('\n').count().max(1);
        #[allow(clippy::cast_precision_loss)]
        let height = font_size_px * line_height * lines as f64;
        Some(Self {
            element_id: element.id,
            left: page.x,
            top: page.y,
            width: width * zoom,
            height,
            font_size_px,
            font_family: font_family.clone(),
            font_weight: font_weight.clone(),
            font_style: font_style.clone(),
            color: fill.clone(),
            align: *align,
            line_height: *line_height,
            rotation: element.rotation,
            text: text.clone(),
        })
    }

    /// Height of a single line box in page pixels.
    #[must_use]
    pub fn line_box_px(&self) -> f64 {
        self.font_size_px * self.line_height
    }
}

/// What a key press inside the editor asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Let the input handle the key.
    Continue,
    /// Commit the current text.
    Commit,
    /// Revert to the text from before the edit, then commit.
    Cancel,
}

/// One open inline edit.
#[derive(Debug, Clone)]
pub struct TextEditSession {
    element_id: ElementId,
    original_text: String,
    text: String,
    overlay: TextOverlay,
}

impl TextEditSession {
    /// Open a session on a text element. `None` for any other kind.
    #[must_use]
    pub fn open(element: &Element, viewport: &Viewport) -> Option<Self> {
        let overlay = TextOverlay::for_element(element, viewport)?;
        Some(Self {
            element_id: element.id,
            original_text: overlay.text.clone(),
            text: overlay.text.clone(),
            overlay,
        })
    }

    #[must_use]
    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    #[must_use]
    pub fn overlay(&self) -> &TextOverlay {
        &self.overlay
    }

    /// Record new input text and the input's reported content height (page
    /// pixels). Returns the overlay height, which never drops below one line.
    pub fn input(&mut self, text: &str, content_height_px: f64) -> f64 {
        text.clone_into(&mut self.text);
        self.overlay.text.clone_from(&self.text);
        self.overlay.height = content_height_px.max(self.overlay.line_box_px());
        self.overlay.height
    }

    /// Classify a key press. Enter with no modifiers commits; Escape cancels.
    #[must_use]
    pub fn key(key: &Key, modifiers: Modifiers) -> EditKey {
        if key.is("Escape") {
            EditKey::Cancel
        } else if key.is("Enter") && !modifiers.shift && !modifiers.has_command() {
            EditKey::Commit
        } else {
            EditKey::Continue
        }
    }

    /// End the session keeping the edited text.
    #[must_use]
    pub fn commit(self) -> (ElementId, String) {
        (self.element_id, self.text)
    }

    /// End the session restoring the pre-edit text.
    #[must_use]
    pub fn cancel(self) -> (ElementId, String) {
        (self.element_id, self.original_text)
    }
}
