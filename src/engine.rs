use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlTextAreaElement};

use crate::config::EditorConfig;
use crate::doc::{DocStore, DrawingConfig};
use crate::element::{Bounds, Element, ElementId, ElementPatch};
use crate::error::EditorError;
use crate::freehand::FreehandCapture;
use crate::hit::{self, Hit, HitOptions, HitPart};
use crate::input::{Button, InputState, Key, Modifiers, UiState};
use crate::render::{self, RenderMode};
use crate::snap::{self, Guide, SnapTargets};
use crate::stage::{NodeState, Stage};
use crate::text_edit::{EditKey, TextEditSession, TextOverlay};
use crate::transform;
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Action {
    /// A freehand stroke was committed as a new element.
    ElementCreated(Element),
    /// An element's attributes changed; forward the patch to persistence.
    ElementUpdated { id: ElementId, patch: ElementPatch },
    /// The selection changed; carries the new ids in selection order.
    SelectionChanged(Vec<ElementId>),
    ZoomChanged(f64),
    /// Show a native text input over the canvas.
    EditTextRequested(TextOverlay),
    /// The text input's height changed while typing.
    EditTextResized { height: f64 },
    /// Remove the native text input.
    EditTextClosed { id: ElementId },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub stage: Stage,
    pub viewport: Viewport,
    pub config: EditorConfig,
    pub ui: UiState,
    pub input: InputState,
    pub freehand: FreehandCapture,
    text_edit: Option<TextEditSession>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_doc(DocStore::new(), EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine around an existing document for the length of one editor session.
    #[must_use]
    pub fn with_doc(doc: DocStore, config: EditorConfig) -> Self {
        let mut stage = Stage::new();
        stage.sync_all(&doc);
        Self {
            doc,
            stage,
            viewport: Viewport::default(),
            config,
            ui: UiState::default(),
            input: InputState::default(),
            freehand: FreehandCapture::default(),
            text_edit: None,
        }
    }

    // --- Data inputs ---

    /// Replace the document with a snapshot. Any gesture or edit in progress is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateId`] if the snapshot repeats an id.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) -> Result<(), EditorError> {
        self.doc.load_snapshot(elements)?;
        self.reset_session();
        Ok(())
    }

    /// Replace the document with a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or repeats an id.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        self.doc.load_json(json)?;
        self.reset_session();
        Ok(())
    }

    fn reset_session(&mut self) {
        self.text_edit = None;
        self.input = InputState::Idle;
        self.freehand.cancel();
        self.ui.guides.clear();
        self.stage.sync_all(&self.doc);
    }

    /// Insert an element created outside the engine (paste, library insert).
    pub fn add_element(&mut self, element: Element) {
        self.stage.sync_element(&element);
        self.doc.add_element(element);
    }

    /// Apply an update from outside the engine. Unknown ids are ignored.
    pub fn apply_update(&mut self, id: &ElementId, patch: &ElementPatch) {
        if !self.doc.update_element(id, patch) {
            return;
        }
        if let Some(el) = self.doc.get(id) {
            self.stage.sync_element(el);
        }
    }

    /// Remove an element. Closes its text editor if one is open on it.
    pub fn remove_element(&mut self, id: &ElementId) -> Vec<Action> {
        let was_selected = self.doc.selection().contains(id);
        if self.doc.remove_element(id).is_none() {
            return Vec::new();
        }
        self.stage.remove(id);
        let mut actions = Vec::new();
        if self.text_edit.as_ref().is_some_and(|s| s.element_id() == *id) {
            self.text_edit = None;
            actions.push(Action::EditTextClosed { id: *id });
        }
        if self.gesture_targets().contains(id) {
            self.input = InputState::Idle;
            self.ui.guides.clear();
        }
        if was_selected {
            actions.push(Action::SelectionChanged(self.doc.selection().ids().to_vec()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace the drawing configuration. Disabling drawing drops a stroke in progress.
    pub fn set_drawing(&mut self, drawing: DrawingConfig) -> Vec<Action> {
        if !drawing.enabled && self.freehand.is_capturing() {
            self.freehand.cancel();
        }
        self.doc.set_drawing(drawing);
        vec![Action::RenderNeeded]
    }

    // --- Viewport ---

    /// Set a manual zoom. Resize will not override it afterwards (unless it is exactly 1×).
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        let applied = self.viewport.set_zoom(zoom);
        tracing::debug!(requested = zoom, applied, "manual zoom");
        vec![Action::ZoomChanged(applied), Action::RenderNeeded]
    }

    /// Container resized: refit unless the zoom was chosen manually.
    pub fn on_container_resize(&mut self, width: f64, height: f64) -> Vec<Action> {
        match self.viewport.fit_to_container(width, height, self.config.fit_padding) {
            Some(zoom) => {
                tracing::info!(width, height, zoom, "fit zoom to container");
                vec![Action::ZoomChanged(zoom), Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Record where the stage sits on the page, for positioning the text overlay.
    pub fn set_stage_offset(&mut self, offset: Point) {
        self.viewport.stage_offset = offset;
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.viewport.screen_to_logical(screen_pt);
        let mut actions = Vec::new();

        // Clicking the canvas blurs the inline editor.
        if self.text_edit.is_some() {
            actions.extend(self.text_edit_blur());
        }

        if self.doc.drawing().enabled {
            self.freehand.begin(world);
            tracing::debug!(x = world.x, y = world.y, "freehand stroke started");
            actions.push(Action::RenderNeeded);
            return actions;
        }

        match hit::hit_test(world, &self.doc, &self.stage, &self.hit_options()) {
            Some(Hit { element_id, part: HitPart::RotateHandle }) => self.begin_rotate(element_id, world),
            Some(Hit { element_id, part: HitPart::ResizeHandle(anchor) }) => {
                if let (Some(el), Some(orig)) = (self.doc.get(&element_id), self.stage.node(&element_id)) {
                    let keep_ratio = el.kind().keeps_ratio();
                    tracing::debug!(id = %element_id, ?anchor, "resize started");
                    self.input = InputState::Resizing { id: element_id, anchor, start_world: world, orig, keep_ratio };
                }
            }
            Some(Hit { element_id, part: HitPart::Body }) => {
                actions.extend(self.press_body(element_id, world, modifiers));
            }
            None => {
                self.input = InputState::Idle;
                if !self.doc.selection().is_empty() {
                    self.doc.selection_mut().clear();
                    actions.push(Action::SelectionChanged(Vec::new()));
                }
            }
        }

        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_rotate(&mut self, id: ElementId, world: Point) {
        if let (Some(el), Some(orig)) = (self.doc.get(&id), self.stage.node(&id)) {
            let center = hit::visual_center(el, &orig);
            tracing::debug!(%id, "rotate started");
            self.input = InputState::Rotating { id, center, start_world: world, orig };
        }
    }

    fn press_body(&mut self, id: ElementId, world: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let selection = self.doc.selection_mut();
        if modifiers.shift {
            selection.toggle(id);
            actions.push(Action::SelectionChanged(selection.ids().to_vec()));
            if !selection.contains(&id) {
                self.input = InputState::Idle;
                return actions;
            }
        } else if !selection.contains(&id) {
            selection.set_single(id);
            actions.push(Action::SelectionChanged(selection.ids().to_vec()));
        }

        let origins = self
            .doc
            .selection()
            .ids()
            .iter()
            .filter_map(|sid| self.stage.node(sid).map(|n| (*sid, n.origin())))
            .collect();
        self.input = InputState::DraggingSelection { start_world: world, origins, moved: false };
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.viewport.screen_to_logical(screen_pt);

        if self.freehand.is_capturing() {
            self.freehand.extend(world);
            return vec![Action::RenderNeeded];
        }

        if self.input.is_idle() {
            return self.hover(world);
        }

        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::DraggingSelection { start_world, origins, moved } => {
                let mut dx = world.x - start_world.x;
                let mut dy = world.y - start_world.y;
                *moved = true;

                self.ui.guides.clear();
                if self.config.snapping && !modifiers.alt {
                    if let Some(bounds) = moved_bounds(&self.doc, &self.stage, origins, dx, dy) {
                        let ids: Vec<ElementId> = origins.iter().map(|(id, _)| *id).collect();
                        let targets = SnapTargets::collect(&self.doc, &self.stage, &ids);
                        let threshold = self.viewport.screen_dist_to_logical(self.config.snap_threshold_px);
                        let snapped = snap::snap_bounds(&bounds, &targets, threshold);
                        dx += snapped.dx;
                        dy += snapped.dy;
                        self.ui.guides = snapped.guides;
                    }
                }

                for (id, origin) in origins.iter() {
                    self.stage.set_position(id, Point::new(origin.x + dx, origin.y + dy));
                }
                vec![Action::RenderNeeded]
            }
            InputState::Resizing { id, anchor, start_world, orig, keep_ratio } => {
                let Some(el) = self.doc.get(id) else {
                    return Vec::new();
                };
                let node = transform::resize_node(el, orig, *anchor, *start_world, world, *keep_ratio || modifiers.shift);
                self.stage.set_node(id, node);
                vec![Action::RenderNeeded]
            }
            InputState::Rotating { id, center, start_world, orig } => {
                let Some(el) = self.doc.get(id) else {
                    return Vec::new();
                };
                let snap = modifiers.shift.then_some(self.config.rotation_snap_deg);
                let node = transform::rotate_node(el, orig, *center, *start_world, world, snap);
                self.stage.set_node(id, node);
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Update the cursor for what is under the pointer.
    fn hover(&mut self, world: Point) -> Vec<Action> {
        let cursor = if self.doc.drawing().enabled {
            "crosshair"
        } else {
            match hit::hit_test(world, &self.doc, &self.stage, &self.hit_options()) {
                Some(Hit { part: HitPart::RotateHandle, .. }) => "grab",
                Some(Hit { part: HitPart::ResizeHandle(anchor), .. }) => anchor.cursor(),
                Some(Hit { part: HitPart::Body, .. }) => "move",
                None => "default",
            }
        };
        if self.ui.cursor == cursor {
            return Vec::new();
        }
        cursor.clone_into(&mut self.ui.cursor);
        vec![Action::SetCursor(cursor.to_owned())]
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }

        if self.freehand.is_capturing() {
            return match self.freehand.finish(self.doc.drawing()) {
                Some(element) => {
                    tracing::debug!(id = %element.id, "freehand stroke committed");
                    self.add_element(element.clone());
                    vec![Action::ElementCreated(element), Action::RenderNeeded]
                }
                None => vec![Action::RenderNeeded],
            };
        }

        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DraggingSelection { origins, moved, .. } => {
                self.ui.guides.clear();
                if !moved {
                    return Vec::new();
                }
                let mut actions: Vec<Action> = origins
                    .iter()
                    .filter_map(|(id, _)| {
                        transform::commit_drag_end(&mut self.doc, &self.stage, id)
                            .map(|patch| Action::ElementUpdated { id: *id, patch })
                    })
                    .collect();
                tracing::debug!(count = actions.len(), "drag committed");
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Resizing { .. } | InputState::Rotating { .. } => self.commit_transform(),
        }
    }

    /// Fold the live node state of every selected element back into the document.
    ///
    /// Each element is reinterpreted against its own node state.
    pub fn commit_transform(&mut self) -> Vec<Action> {
        let ids = self.doc.selection().ids().to_vec();
        let mut actions: Vec<Action> = transform::commit_transform_end_all(&mut self.doc, &mut self.stage, &ids)
            .into_iter()
            .map(|(id, patch)| Action::ElementUpdated { id, patch })
            .collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Text editing ---

    /// Open the inline editor when a text element is double-clicked.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        if let Some(open) = &self.text_edit {
            tracing::warn!(id = %open.element_id(), "text editor already open; ignoring double-click");
            return Vec::new();
        }
        let world = self.viewport.screen_to_logical(screen_pt);
        let Some(Hit { element_id, part: HitPart::Body }) =
            hit::hit_test(world, &self.doc, &self.stage, &self.hit_options())
        else {
            return Vec::new();
        };
        let Some(session) = self.doc.get(&element_id).and_then(|el| TextEditSession::open(el, &self.viewport)) else {
            return Vec::new();
        };

        self.input = InputState::Idle;
        self.ui.guides.clear();
        let overlay = session.overlay().clone();
        self.text_edit = Some(session);
        tracing::debug!(id = %element_id, "text edit opened");
        vec![Action::EditTextRequested(overlay), Action::RenderNeeded]
    }

    /// The overlay's text changed. `content_height_px` is the input's scroll height.
    pub fn text_edit_input(&mut self, text: &str, content_height_px: f64) -> Vec<Action> {
        match self.text_edit.as_mut() {
            Some(session) => {
                let height = session.input(text, content_height_px);
                vec![Action::EditTextResized { height }]
            }
            None => Vec::new(),
        }
    }

    /// A key was pressed inside the overlay.
    pub fn text_edit_key(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.text_edit.is_none() {
            return Vec::new();
        }
        match TextEditSession::key(key, modifiers) {
            EditKey::Continue => Vec::new(),
            outcome => self.close_text_edit(outcome),
        }
    }

    /// The overlay lost focus: commit.
    pub fn text_edit_blur(&mut self) -> Vec<Action> {
        self.close_text_edit(EditKey::Commit)
    }

    fn close_text_edit(&mut self, outcome: EditKey) -> Vec<Action> {
        let Some(session) = self.text_edit.take() else {
            return Vec::new();
        };
        let (id, text) = if outcome == EditKey::Cancel { session.cancel() } else { session.commit() };
        let patch = ElementPatch { text: Some(text), ..ElementPatch::default() };

        let mut actions = vec![Action::EditTextClosed { id }];
        if self.doc.update_element(&id, &patch) {
            if let Some(el) = self.doc.get(&id) {
                self.stage.sync_element(el);
            }
            actions.push(Action::ElementUpdated { id, patch });
        }
        tracing::debug!(%id, ?outcome, "text edit closed");
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.text_edit.is_some() {
            return self.text_edit_key(key, modifiers);
        }

        if key.is("Escape") {
            self.freehand.cancel();
            if self.doc.selection().is_empty() {
                return Vec::new();
            }
            self.doc.selection_mut().clear();
            return vec![Action::SelectionChanged(Vec::new()), Action::RenderNeeded];
        }

        let Some((ux, uy)) = key.arrow_direction() else {
            return Vec::new();
        };
        if !self.input.is_idle() || self.doc.selection().is_empty() {
            return Vec::new();
        }
        let step = if modifiers.shift { self.config.nudge_step_large } else { self.config.nudge_step };
        let ids = self.doc.selection().ids().to_vec();
        let mut actions = Vec::new();
        for id in &ids {
            let Some(node) = self.stage.node(id) else {
                continue;
            };
            self.stage.set_position(id, Point::new(node.x + ux * step, node.y + uy * step));
            if let Some(patch) = transform::commit_drag_end(&mut self.doc, &self.stage, id) {
                actions.push(Action::ElementUpdated { id: *id, patch });
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// The selected element ids, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        self.doc.selection().ids()
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    /// Live node state of an element.
    #[must_use]
    pub fn node(&self, id: &ElementId) -> Option<NodeState> {
        self.stage.node(id)
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.ui.guides
    }

    #[must_use]
    pub fn text_edit(&self) -> Option<&TextEditSession> {
        self.text_edit.as_ref()
    }

    /// Element whose node is hidden under the inline editor.
    #[must_use]
    pub fn hidden_element(&self) -> Option<ElementId> {
        self.text_edit.as_ref().map(TextEditSession::element_id)
    }

    /// Whether the element's node is drawn.
    #[must_use]
    pub fn is_node_visible(&self, id: &ElementId) -> bool {
        self.hidden_element() != Some(*id)
    }

    /// Element carrying resize and rotate handles: the single selected element, unless editing.
    #[must_use]
    pub fn handles_target(&self) -> Option<ElementId> {
        if self.text_edit.is_some() {
            return None;
        }
        self.doc.selection().single()
    }

    fn hit_options(&self) -> HitOptions {
        HitOptions {
            zoom: self.viewport.zoom(),
            handle_radius_px: self.config.handle_radius_px,
            rotate_handle_offset_px: self.config.rotate_handle_offset_px,
            selected: self.handles_target(),
            hidden: self.hidden_element(),
        }
    }

    fn gesture_targets(&self) -> Vec<ElementId> {
        match &self.input {
            InputState::Idle => Vec::new(),
            InputState::DraggingSelection { origins, .. } => origins.iter().map(|(id, _)| *id).collect(),
            InputState::Resizing { id, .. } | InputState::Rotating { id, .. } => vec![*id],
        }
    }
}

/// Canvas-space bounds of the dragged elements after moving their origins by `(dx, dy)`.
fn moved_bounds(doc: &DocStore, stage: &Stage, origins: &[(ElementId, Point)], dx: f64, dy: f64) -> Option<Bounds> {
    origins
        .iter()
        .filter_map(|(id, origin)| {
            let el = doc.get(id)?;
            let node = stage.node(id)?;
            let moved = NodeState { x: origin.x + dx, y: origin.y + dy, ..node };
            Some(moved.world_bounds(&el.local_bounds()))
        })
        .reduce(|a, b| a.union(&b))
}

// =============================================================
// Browser engine
// =============================================================

/// The native `<textarea>` laid over the canvas while a text element is edited.
///
/// Removed from the page when dropped.
pub struct DomTextOverlay {
    element: HtmlTextAreaElement,
    id: ElementId,
}

impl DomTextOverlay {
    /// Create the textarea and append it to the document body.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the DOM is unavailable or rejects the element.
    pub fn create(overlay: &TextOverlay) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
        let element = document
            .create_element("textarea")?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(JsValue::from)?;
        element.set_value(&overlay.text);

        let style = element.style();
        let props = [
            ("position", "absolute".to_owned()),
            ("left", format!("{}px", overlay.left)),
            ("top", format!("{}px", overlay.top)),
            ("width", format!("{}px", overlay.width)),
            ("height", format!("{}px", overlay.height)),
            ("font-size", format!("{}px", overlay.font_size_px)),
            ("font-family", overlay.font_family.clone()),
            ("font-weight", overlay.font_weight.clone()),
            ("font-style", overlay.font_style.clone()),
            ("color", overlay.color.clone()),
            ("text-align", overlay.align.as_str().to_owned()),
            ("line-height", overlay.line_height.to_string()),
            ("transform", format!("rotate({}deg)", overlay.rotation)),
            ("transform-origin", "top left".to_owned()),
            ("margin", "0".to_owned()),
            ("padding", "0".to_owned()),
            ("border", "none".to_owned()),
            ("outline", "none".to_owned()),
            ("resize", "none".to_owned()),
            ("overflow", "hidden".to_owned()),
            ("background", "transparent".to_owned()),
        ];
        for (name, value) in &props {
            style.set_property(name, value)?;
        }

        body.append_child(&element)?;
        element.focus()?;
        Ok(Self { element, id: overlay.element_id })
    }

    /// Apply a new height in page pixels.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the style update is rejected.
    pub fn set_height(&self, height: f64) -> Result<(), JsValue> {
        self.element.style().set_property("height", &format!("{height}px"))
    }

    #[must_use]
    pub fn element_id(&self) -> ElementId {
        self.id
    }
}

impl Drop for DomTextOverlay {
    fn drop(&mut self) {
        self.element.remove();
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    overlay: Option<DomTextOverlay>,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, doc: DocStore, config: EditorConfig) -> Self {
        Self { canvas, core: EngineCore::with_doc(doc, config), overlay: None }
    }

    // --- Delegated data inputs ---

    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or repeats an id.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        self.core.load_json(json)?;
        self.overlay = None;
        Ok(())
    }

    pub fn add_element(&mut self, element: Element) {
        self.core.add_element(element);
    }

    pub fn apply_update(&mut self, id: &ElementId, patch: &ElementPatch) {
        self.core.apply_update(id, patch);
    }

    pub fn remove_element(&mut self, id: &ElementId) -> Vec<Action> {
        let actions = self.core.remove_element(id);
        self.after(actions)
    }

    pub fn set_drawing(&mut self, drawing: DrawingConfig) -> Vec<Action> {
        self.core.set_drawing(drawing)
    }

    // --- Viewport ---

    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        self.core.set_zoom(zoom)
    }

    /// Resize the backing canvas to the fitted stage and report the new zoom.
    pub fn on_container_resize(&mut self, width: f64, height: f64) -> Vec<Action> {
        let actions = self.core.on_container_resize(width, height);
        let (w, h) = self.core.viewport.stage_size();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (w_px, h_px) = (w.round() as u32, h.round() as u32);
        self.canvas.set_width(w_px);
        self.canvas.set_height(h_px);
        actions
    }

    pub fn set_stage_offset(&mut self, offset: Point) {
        self.core.set_stage_offset(offset);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen_pt, button, modifiers);
        self.after(actions)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let actions = self.core.on_double_click(screen_pt);
        self.after(actions)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.after(actions)
    }

    pub fn text_edit_input(&mut self, text: &str, content_height_px: f64) -> Vec<Action> {
        let actions = self.core.text_edit_input(text, content_height_px);
        self.after(actions)
    }

    pub fn text_edit_key(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.text_edit_key(key, modifiers);
        self.after(actions)
    }

    pub fn text_edit_blur(&mut self) -> Vec<Action> {
        let actions = self.core.text_edit_blur();
        self.after(actions)
    }

    /// Keep the DOM overlay in step with the core's edit session.
    fn after(&mut self, actions: Vec<Action>) -> Vec<Action> {
        for action in &actions {
            let result = match action {
                Action::EditTextRequested(overlay) => DomTextOverlay::create(overlay).map(|o| {
                    self.overlay = Some(o);
                }),
                Action::EditTextResized { height } => match &self.overlay {
                    Some(o) => o.set_height(*height),
                    None => Ok(()),
                },
                Action::EditTextClosed { id } => {
                    if self.overlay.as_ref().is_some_and(|o| o.element_id() == *id) {
                        self.overlay = None;
                    }
                    Ok(())
                }
                _ => Ok(()),
            };
            if let Err(err) = result {
                tracing::warn!(?err, "text overlay update failed");
            }
        }
        actions
    }

    // --- Render ---

    fn context(&self) -> Result<CanvasRenderingContext2d, JsValue> {
        self.canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self.context()?;
        render::draw(&ctx, &self.core, RenderMode::Editor)
    }

    /// Rasterize the slide without editor chrome and return it as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if rendering or encoding fails.
    pub fn export_png(&self) -> Result<String, JsValue> {
        let ctx = self.context()?;
        render::draw(&ctx, &self.core, RenderMode::Export)?;
        let url = self.canvas.to_data_url_with_type("image/png")?;
        render::draw(&ctx, &self.core, RenderMode::Editor)?;
        Ok(url)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        self.core.selection()
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.core.zoom()
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.core.element(id)
    }
}
