//! Canvas store: the live page layout being edited.
//!
//! DESIGN
//! ======
//! `CanvasStore` owns the ordered component list, the selection, hover and
//! view settings, and the undo/redo [`History`]. Fields are private; every
//! edit goes through a method so that each content mutation records exactly
//! one snapshot. Callers pass the store by `&mut` to whatever needs to edit
//! it (property editor, CLI, tests); there is no global instance.
//!
//! Missing ids are silent no-ops for remove/update/select. Content updates
//! still record a snapshot in that case, so history length tracks the number
//! of edit calls rather than the number of effective changes.
//!
//! Selection always names a component that is currently on the canvas:
//! selecting an unknown id is ignored, and undo/redo drop a selection whose
//! component is not in the restored state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::component::{self, BuilderError, ComponentInstance};
use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::document::{Document, ImportOutcome};
use crate::history::History;

/// Editor-only view toggles. Never recorded in history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub zoom: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self { show_grid: true, snap_to_grid: true, zoom: 1.0 }
    }
}

/// The live document plus selection and history.
#[derive(Debug, Clone, Default)]
pub struct CanvasStore {
    components: Vec<ComponentInstance>,
    selected: Option<String>,
    hovered: Option<String>,
    application_id: Option<String>,
    application_name: String,
    history: History,
    view: ViewSettings,
}

impl CanvasStore {
    /// Empty canvas with empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas opened on `components`, with that state as history index 0.
    #[must_use]
    pub fn from_components(components: Vec<ComponentInstance>) -> Self {
        let mut store = Self::new();
        store.load_components(components);
        store
    }

    // =========================================================================
    // COMPONENT EDITS
    // =========================================================================

    /// Create a component, append it, select it and record a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::UnknownComponentType`] if `kind` is not
    /// registered. The store is left untouched.
    pub fn add_component(&mut self, kind: &str, props: Map<String, Value>) -> Result<&ComponentInstance, BuilderError> {
        let instance = component::create(kind, props)?;
        debug!(id = %instance.id, kind, "component added");
        self.selected = Some(instance.id.clone());
        self.components.push(instance);
        self.push_history();
        let index = self.components.len() - 1;
        Ok(&self.components[index])
    }

    /// Remove a component by id and record a snapshot.
    pub fn remove_component(&mut self, id: &str) {
        let before = self.components.len();
        self.components.retain(|c| c.id != id);
        if self.components.len() != before {
            debug!(id, "component removed");
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        self.push_history();
    }

    /// Shallow-merge arbitrary top-level fields and record a snapshot.
    pub fn update_component(&mut self, id: &str, updates: &Map<String, Value>) {
        if let Some(target) = self.component_mut(id) {
            target.apply_fields(updates);
        }
        self.push_history();
    }

    /// Merge into `props` key by key and record a snapshot.
    pub fn update_component_props(&mut self, id: &str, updates: &Map<String, Value>) {
        if let Some(target) = self.component_mut(id) {
            target.merge_props(updates);
        }
        self.push_history();
    }

    /// Merge into `styles` key by key and record a snapshot.
    pub fn update_component_styles(&mut self, id: &str, updates: &Map<String, Value>) {
        if let Some(target) = self.component_mut(id) {
            target.merge_styles(updates);
        }
        self.push_history();
    }

    /// Set a component's canvas position. Drag moves are not undoable, so
    /// this does not record a snapshot.
    pub fn move_component(&mut self, id: &str, position: Value) {
        if let Some(target) = self.component_mut(id) {
            target.position = Some(position);
        }
    }

    // =========================================================================
    // SELECTION / HOVER
    // =========================================================================

    /// Select a component. Unknown ids are ignored.
    pub fn select_component(&mut self, id: &str) {
        if self.component(id).is_some() {
            self.selected = Some(id.to_owned());
        }
    }

    pub fn deselect_component(&mut self) {
        self.selected = None;
    }

    /// Mark a component as hovered. Unknown ids are ignored.
    pub fn set_hovered_component(&mut self, id: &str) {
        if self.component(id).is_some() {
            self.hovered = Some(id.to_owned());
        }
    }

    pub fn clear_hovered_component(&mut self) {
        self.hovered = None;
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// Record the current component list as the newest snapshot.
    pub fn push_history(&mut self) {
        self.history.push(&self.components);
    }

    /// Restore the previous snapshot. Returns `false` at the oldest state.
    pub fn undo(&mut self) -> bool {
        let Some(components) = self.history.undo() else {
            return false;
        };
        self.restore(components);
        true
    }

    /// Restore the next snapshot. Returns `false` at the newest state.
    pub fn redo(&mut self) -> bool {
        let Some(components) = self.history.redo() else {
            return false;
        };
        self.restore(components);
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, components: Vec<ComponentInstance>) {
        self.components = components;
        if let Some(id) = self.selected.clone() {
            if self.component(&id).is_none() {
                self.selected = None;
            }
        }
        if let Some(id) = self.hovered.clone() {
            if self.component(&id).is_none() {
                self.hovered = None;
            }
        }
    }

    // =========================================================================
    // LOAD / SAVE
    // =========================================================================

    /// Replace the canvas wholesale and restart history from this state.
    pub fn load_components(&mut self, components: Vec<ComponentInstance>) {
        debug!(count = components.len(), "components loaded");
        self.components = components;
        self.selected = None;
        self.hovered = None;
        self.history.reset(&self.components);
    }

    /// Empty the canvas and forget all history.
    pub fn clear_canvas(&mut self) {
        self.components.clear();
        self.selected = None;
        self.hovered = None;
        self.history.clear();
    }

    /// Set the application this canvas belongs to.
    pub fn set_application(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.application_id = Some(id.into());
        self.application_name = name.into();
    }

    /// Serializable snapshot of the current canvas.
    #[must_use]
    pub fn export_state(&self) -> Document {
        Document::new(self.application_id.clone(), self.application_name.clone(), self.components.clone())
    }

    /// Load a document payload.
    ///
    /// Payloads without a `components` array are ignored and leave the store
    /// untouched; the returned outcome says why. When the payload carries an
    /// `applicationId`, the application id and name are taken from it too.
    pub fn import_state(&mut self, payload: &Value) -> ImportOutcome {
        match Document::from_value(payload) {
            Ok(doc) => self.import_document(doc),
            Err(issue) => {
                warn!(%issue, "document import ignored");
                ImportOutcome::Ignored(issue)
            }
        }
    }

    /// Load an already-parsed document.
    pub fn import_document(&mut self, doc: Document) -> ImportOutcome {
        let count = doc.components.len();
        self.load_components(doc.components);
        if let Some(id) = doc.application_id {
            self.set_application(id, doc.application_name);
        }
        ImportOutcome::Loaded { components: count }
    }

    // =========================================================================
    // VIEW SETTINGS
    // =========================================================================

    pub fn toggle_grid(&mut self) {
        self.view.show_grid = !self.view.show_grid;
    }

    pub fn toggle_snap_to_grid(&mut self) {
        self.view.snap_to_grid = !self.view.snap_to_grid;
    }

    /// Set zoom, clamped to `[ZOOM_MIN, ZOOM_MAX]`. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        self.view.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.view.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.view.zoom - ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.view.zoom = 1.0;
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Components in canvas order.
    #[must_use]
    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    #[must_use]
    pub fn component(&self, id: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| c.id == id)
    }

    fn component_mut(&mut self, id: &str) -> Option<&mut ComponentInstance> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    #[must_use]
    pub fn selected_component(&self) -> Option<&ComponentInstance> {
        self.selected.as_deref().and_then(|id| self.component(id))
    }

    #[must_use]
    pub fn selected_component_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn hovered_component_id(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// History cursor; `None` before anything was recorded.
    #[must_use]
    pub fn history_index(&self) -> Option<usize> {
        self.history.index()
    }

    #[must_use]
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    #[must_use]
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    #[must_use]
    pub fn view(&self) -> ViewSettings {
        self.view
    }
}
