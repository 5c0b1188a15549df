//! Document state: the slide's element collection, the selection and the drawing config.
//!
//! `DocStore` is the single owner of slide state for an editor session. The
//! engine receives it at construction and mutates it only through
//! [`DocStore::update_element`] and [`DocStore::add_element`]; there is no
//! process-wide store. Insertion order is paint order (first element is drawn
//! at the back).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementPatch};
use crate::error::EditorError;

/// Freehand drawing mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    /// Pointer-down starts a stroke instead of selecting.
    pub enabled: bool,
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in logical units.
    pub brush_size: f64,
    /// Stroke opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self { enabled: false, color: "#111827".to_owned(), brush_size: 4.0, opacity: 1.0 }
    }
}

/// Ordered, duplicate-free set of selected element ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The selected id when exactly one element is selected.
    #[must_use]
    pub fn single(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Replace the selection with exactly one id.
    pub fn set_single(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &ElementId) {
        self.ids.retain(|s| s != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// In-memory store for one slide.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    elements: Vec<Element>,
    selection: Selection,
    drawing: DrawingConfig,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element at the front of the paint order. An element with the
    /// same id is replaced in place instead.
    pub fn add_element(&mut self, element: Element) {
        if let Some(existing) = self.elements.iter_mut().find(|e| e.id == element.id) {
            *existing = element;
        } else {
            self.elements.push(element);
        }
    }

    /// Apply a partial update. Returns false (and changes nothing) if the element doesn't exist.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        element.apply_patch(patch);
        true
    }

    /// Remove an element, dropping it from the selection too.
    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let pos = self.elements.iter().position(|e| e.id == *id)?;
        self.selection.remove(id);
        Some(self.elements.remove(pos))
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    /// All elements, back to front.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Replace all elements with a snapshot. Clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateId`] if two elements share an id; the
    /// store is left unchanged in that case.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) -> Result<(), EditorError> {
        let mut seen = HashSet::with_capacity(elements.len());
        for el in &elements {
            if !seen.insert(el.id) {
                return Err(EditorError::DuplicateId(el.id));
            }
        }
        self.elements = elements;
        self.selection.clear();
        tracing::info!(count = self.elements.len(), "loaded slide snapshot");
        Ok(())
    }

    /// Parse and load a JSON array of elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids are duplicated.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let elements: Vec<Element> = serde_json::from_str(json)?;
        self.load_snapshot(elements)
    }

    /// Serialize all elements, back to front, as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.elements)?)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    #[must_use]
    pub fn drawing(&self) -> &DrawingConfig {
        &self.drawing
    }

    pub fn set_drawing(&mut self, drawing: DrawingConfig) {
        self.drawing = drawing;
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
