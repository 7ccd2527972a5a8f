use serde_json::Value;

use crate::catalog::Template;
use crate::consts::NEW_FIELD_KEY_PREFIX;
use crate::doc::{self, FieldNode, NodeId};
use crate::hit::{NodeBounds, Point, Rect};
use crate::input::{DragState, DropIntent, Hover};
use crate::palette;
use crate::store::{FieldStore, StoreConfig, StoreError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from gesture handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The field list changed; re-read `fields()`.
    FieldsChanged,
    /// The selection moved (or was cleared).
    SelectionChanged(Option<NodeId>),
    /// The beside-drop preview moved (or was cleared).
    PreviewChanged(Option<Hover>),
    TitleChanged(String),
    RenderNeeded,
}

/// Editor core: the store plus the in-flight drag gesture.
///
/// Every UI gesture enters here and comes back out as a list of `Action`s.
/// No host or rendering dependencies, so the whole editing flow is testable.
#[derive(Debug, Default)]
pub struct EditorCore {
    pub store: FieldStore,
    pub drag: DragState,
}

impl EditorCore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { store: FieldStore::new(config), drag: DragState::default() }
    }

    /// Wrap an existing store.
    #[must_use]
    pub fn with_store(store: FieldStore) -> Self {
        Self { store, drag: DragState::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn fields(&self) -> &[FieldNode] {
        self.store.fields()
    }

    #[must_use]
    pub fn selection(&self) -> Option<NodeId> {
        self.store.selected_id()
    }

    /// Current beside-drop preview, if a palette drag is over a node.
    #[must_use]
    pub fn preview(&self) -> Option<Hover> {
        self.drag.hover()
    }

    /// Create a palette field with a key unique across the current tree.
    #[must_use]
    pub fn new_field(&self, field_type: &str) -> FieldNode {
        let taken = doc::collect_keys(self.store.fields());
        let key = doc::unique_key(NEW_FIELD_KEY_PREFIX, "_", &taken, &mut rand::rng());
        palette::create_field(field_type, key)
    }

    // --- Palette ---

    /// A palette item was clicked: append a new field and select it.
    pub fn on_palette_click(&mut self, field_type: &str) -> Vec<Action> {
        let node = self.new_field(field_type);
        let before = self.selection();
        let id = self.store.append_field(node);
        self.select_created(id);
        tracing::info!(field_type, %id, "field appended from palette");
        self.changed(before)
    }

    // --- Drag and drop ---

    /// A palette item started dragging.
    pub fn on_drag_start_external(&mut self, field_type: &str) {
        self.drag.begin_external(field_type);
    }

    /// The top-level node at `from` started dragging.
    pub fn on_drag_start_reorder(&mut self, from: usize) {
        self.drag.begin_reorder(from);
    }

    /// The drag moved over the node `target`, laid out at `rect`.
    pub fn on_drag_over_node(&mut self, target: NodeId, rect: Rect, pointer_x: f64) -> Vec<Action> {
        let changed = self.drag.hover_node(target, rect, pointer_x);
        self.preview_actions(changed)
    }

    /// The drag moved to `pointer`; `bounds` are the laid-out top-level nodes.
    pub fn on_drag_move(&mut self, bounds: &[NodeBounds], pointer: Point) -> Vec<Action> {
        let changed = self.drag.hover_at(bounds, pointer);
        self.preview_actions(changed)
    }

    /// The drag moved over empty list space.
    pub fn on_drag_over_empty(&mut self) -> Vec<Action> {
        let changed = self.drag.hover_empty();
        self.preview_actions(changed)
    }

    /// The drag left the list or was cancelled.
    pub fn on_drag_exit(&mut self) -> Vec<Action> {
        let had_preview = self.drag.hover().is_some();
        self.drag.exit();
        self.preview_actions(had_preview)
    }

    /// The drag ended on the list at slot `index`.
    pub fn on_drop(&mut self, index: usize) -> Vec<Action> {
        let had_preview = self.drag.hover().is_some();
        let Some(intent) = self.drag.finish(index) else {
            return self.preview_actions(had_preview);
        };
        let before = self.selection();
        let outcome = match intent {
            DropIntent::Insert { field_type, index } => {
                let node = self.new_field(&field_type);
                let id = self.store.insert_field_at(node, index);
                self.select_created(id);
                Ok(())
            }
            DropIntent::Beside { field_type, target, side } => {
                let node = self.new_field(&field_type);
                self.store.insert_beside(target, node, side).map(|_| ())
            }
            DropIntent::Reorder { from, to } => self.store.reorder(from, to),
        };
        let mut actions = if had_preview { vec![Action::PreviewChanged(None)] } else { Vec::new() };
        match outcome {
            Ok(()) => actions.extend(self.changed(before)),
            Err(err) => {
                tracing::warn!(error = %err, "drop discarded");
                if had_preview {
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    // --- Selection and properties ---

    /// A node was clicked. `None` clears the selection.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for an id that is not in the tree.
    pub fn select(&mut self, id: Option<NodeId>) -> Result<Vec<Action>, StoreError> {
        if self.selection() == id {
            return Ok(Vec::new());
        }
        self.store.set_selected(id)?;
        Ok(vec![Action::SelectionChanged(id), Action::RenderNeeded])
    }

    /// Apply a properties-editor patch to a node's attributes.
    ///
    /// # Errors
    ///
    /// See `FieldStore::patch_attributes`.
    pub fn patch(&mut self, id: NodeId, patch: &Value) -> Result<Vec<Action>, StoreError> {
        self.store.patch_attributes(id, patch)?;
        Ok(vec![Action::FieldsChanged, Action::RenderNeeded])
    }

    /// Edit a node in place through a closure.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for an unknown node.
    pub fn edit(&mut self, id: NodeId, edit: impl FnOnce(&mut FieldNode)) -> Result<Vec<Action>, StoreError> {
        self.store.edit_node(id, edit)?;
        Ok(vec![Action::FieldsChanged, Action::RenderNeeded])
    }

    /// # Errors
    ///
    /// See `FieldStore::duplicate`.
    pub fn duplicate(&mut self, id: NodeId) -> Result<Vec<Action>, StoreError> {
        let before = self.selection();
        self.store.duplicate(id)?;
        Ok(self.changed(before))
    }

    /// # Errors
    ///
    /// Returns `NodeNotFound` for an unknown node.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<Action>, StoreError> {
        let before = self.selection();
        self.store.remove_field(id)?;
        Ok(self.changed(before))
    }

    // --- Document-level ---

    pub fn set_title(&mut self, title: &str) -> Vec<Action> {
        if self.store.title() == title {
            return Vec::new();
        }
        self.store.set_title(title);
        vec![Action::TitleChanged(title.to_owned())]
    }

    /// Replace the tree with imported fields.
    pub fn import(&mut self, fields: Vec<FieldNode>, title: Option<&str>) -> Vec<Action> {
        let before = self.selection();
        let previous_title = self.store.title().to_owned();
        self.store.import_tree(fields, title);
        let mut actions = self.changed(before);
        if self.store.title() != previous_title {
            actions.insert(0, Action::TitleChanged(self.store.title().to_owned()));
        }
        actions
    }

    /// Load a catalog template, retitling the form after it.
    pub fn apply_template(&mut self, template: &Template) -> Vec<Action> {
        tracing::info!(template = %template.id, "applying template");
        self.import(template.instantiate(), Some(&template.name))
    }

    pub fn clear(&mut self) -> Vec<Action> {
        let before = self.selection();
        self.store.clear();
        self.changed(before)
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        let before = self.selection();
        if self.store.undo() { self.changed(before) } else { Vec::new() }
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let before = self.selection();
        if self.store.redo() { self.changed(before) } else { Vec::new() }
    }

    // --- Helpers ---

    fn select_created(&mut self, id: NodeId) {
        if let Err(err) = self.store.set_selected(Some(id)) {
            tracing::warn!(error = %err, "new field not selectable");
        }
    }

    fn changed(&self, selection_before: Option<NodeId>) -> Vec<Action> {
        let mut actions = vec![Action::FieldsChanged];
        let selection = self.selection();
        if selection != selection_before {
            actions.push(Action::SelectionChanged(selection));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn preview_actions(&self, changed: bool) -> Vec<Action> {
        if changed { vec![Action::PreviewChanged(self.drag.hover()), Action::RenderNeeded] } else { Vec::new() }
    }
}
