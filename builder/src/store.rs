//! Field tree store — the canonical form state and its mutations.
//!
//! DESIGN
//! ======
//! The store owns the top-level list, the selection, the form title and the
//! history. Every mutating operation runs through `commit`, a two-phase step:
//! stage a deep snapshot of the current list, apply the mutation in place, and
//! only if it succeeds flush the snapshot to the history. A failed mutation
//! restores the staged snapshot, so neither the list nor the history ever
//! observe a partial edit. Nothing is deferred: once an operation returns,
//! `undo` restores exactly the state before it.
//!
//! Selection is held by `NodeId`, not by reference. It is not history-recorded;
//! after undo/redo it is re-resolved against the restored tree and cleared if
//! the node no longer exists.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde_json::Value;

use crate::consts::{DEFAULT_FORM_TITLE, DEFAULT_HISTORY_LIMIT};
use crate::doc::{self, FieldNode, NodeId};
use crate::history::History;
use crate::layout::{self, LayoutError, Side};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("cannot duplicate a field without a key: {0}")]
    MissingKey(NodeId),
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("index {index} out of range for {len} top-level fields")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("attribute patch must be a JSON object")]
    InvalidPatch,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Construction parameters for a `FieldStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum undo depth. `usize::MAX` keeps everything.
    pub history_limit: usize,
    /// Title of a fresh form.
    pub default_title: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { history_limit: DEFAULT_HISTORY_LIMIT, default_title: DEFAULT_FORM_TITLE.to_owned() }
    }
}

/// Canonical editor state: fields, selection, title, and history.
#[derive(Debug, Clone)]
pub struct FieldStore {
    fields: Vec<FieldNode>,
    selected: Option<NodeId>,
    title: String,
    history: History,
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl FieldStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            fields: Vec::new(),
            selected: None,
            title: config.default_title,
            history: History::new(config.history_limit),
        }
    }

    /// Create a store seeded with `fields`. The seed is not undoable.
    #[must_use]
    pub fn with_fields(config: StoreConfig, fields: Vec<FieldNode>) -> Self {
        Self { fields, ..Self::new(config) }
    }

    // --- Queries ---

    /// The top-level list.
    #[must_use]
    pub fn fields(&self) -> &[FieldNode] {
        &self.fields
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<NodeId> {
        self.selected
    }

    /// The selected node, at any depth.
    #[must_use]
    pub fn selected_node(&self) -> Option<&FieldNode> {
        self.selected.and_then(|id| doc::find(&self.fields, id))
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Look up a node at any depth.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&FieldNode> {
        doc::find(&self.fields, id)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    // --- Non-recorded setters ---

    /// Set or clear the selection. Not history-recorded.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `id` is not in the tree; the selection is unchanged.
    pub fn set_selected(&mut self, id: Option<NodeId>) -> Result<(), StoreError> {
        if let Some(id) = id {
            if !doc::contains(&self.fields, id) {
                tracing::warn!(%id, "cannot select a node that is not in the tree");
                return Err(StoreError::NodeNotFound(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    /// Rename the form. Not history-recorded.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // --- Mutations ---

    /// Stage a snapshot, apply `mutate`, and flush the snapshot on success.
    fn commit<T>(
        &mut self,
        label: &'static str,
        mutate: impl FnOnce(&mut Vec<FieldNode>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let staged = self.fields.clone();
        match mutate(&mut self.fields) {
            Ok(out) => {
                self.history.record_before_mutation(label, staged);
                Ok(out)
            }
            Err(err) => {
                self.fields = staged;
                tracing::warn!(op = label, error = %err, "mutation aborted");
                Err(err)
            }
        }
    }

    /// Append a node to the end of the top-level list.
    pub fn append_field(&mut self, node: FieldNode) -> NodeId {
        let id = node.id;
        self.record_infallible("append", |fields| fields.push(node));
        id
    }

    /// Insert a node into the top-level list. `index` is clamped to `[0, len]`.
    pub fn insert_field_at(&mut self, node: FieldNode, index: usize) -> NodeId {
        let id = node.id;
        self.record_infallible("insert", |fields| {
            let at = index.min(fields.len());
            fields.insert(at, node);
        });
        id
    }

    /// Move the top-level node at `from` to `to`. `to` is clamped to the last slot.
    ///
    /// Equal indices still record a history entry.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `from` does not address a node.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        self.commit("reorder", |fields| {
            let len = fields.len();
            if from >= len {
                return Err(StoreError::IndexOutOfRange { index: from, len });
            }
            let moved = fields.remove(from);
            let at = to.min(fields.len());
            fields.insert(at, moved);
            Ok(())
        })
    }

    /// Record the current list as an undo point after an in-place edit made elsewhere.
    ///
    /// Prefer `edit_node`, which snapshots before the edit runs.
    pub fn touch_fields(&mut self) {
        self.record_infallible("touch", |_| {});
    }

    /// Mutate a node at any depth. The snapshot precedes the edit.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `id` is not in the tree.
    pub fn edit_node(&mut self, id: NodeId, edit: impl FnOnce(&mut FieldNode)) -> Result<(), StoreError> {
        self.commit("edit", |fields| {
            let node = doc::find_mut(fields, id).ok_or(StoreError::NodeNotFound(id))?;
            edit(node);
            Ok(())
        })
    }

    /// Merge a sparse attribute patch into a node (`null` deletes a key).
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for an unknown node and `InvalidPatch` for a non-object patch.
    pub fn patch_attributes(&mut self, id: NodeId, patch: &Value) -> Result<(), StoreError> {
        self.commit("patch", |fields| {
            let node = doc::find_mut(fields, id).ok_or(StoreError::NodeNotFound(id))?;
            if node.apply_patch(patch) { Ok(()) } else { Err(StoreError::InvalidPatch) }
        })
    }

    /// Deep-copy a keyed node, give it a fresh unique key, append it, and select it.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for an unknown node and `MissingKey` for a node
    /// without a key. No state changes on error.
    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId, StoreError> {
        let copy_id = self.commit("duplicate", |fields| {
            let source = doc::find(fields, id).ok_or(StoreError::NodeNotFound(id))?;
            let copy = doc::duplicate_node(source, fields, &mut rand::rng()).ok_or(StoreError::MissingKey(id))?;
            let copy_id = copy.id;
            fields.push(copy);
            Ok(copy_id)
        })?;
        self.selected = Some(copy_id);
        Ok(copy_id)
    }

    /// Replace the whole tree, clear the selection, and optionally retitle.
    ///
    /// A blank title leaves the current one in place.
    pub fn import_tree(&mut self, nodes: Vec<FieldNode>, title: Option<&str>) {
        self.record_infallible("import", |fields| *fields = nodes);
        self.selected = None;
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            self.title = title.to_owned();
        }
    }

    /// Empty the tree and clear the selection.
    pub fn clear(&mut self) {
        self.record_infallible("clear", Vec::clear);
        self.selected = None;
    }

    /// Drop `new_node` beside a top-level `target`, creating or extending a row.
    /// Selects the new node on success.
    ///
    /// # Errors
    ///
    /// Returns `Layout(TargetNotFound)` if `target` is not a top-level node.
    pub fn insert_beside(&mut self, target: NodeId, new_node: FieldNode, side: Side) -> Result<NodeId, StoreError> {
        let new_id = new_node.id;
        self.commit("beside", |fields| {
            *fields = layout::compose_beside(fields, target, new_node, side)?;
            Ok(())
        })?;
        self.selected = Some(new_id);
        Ok(new_id)
    }

    /// Remove a node at any depth.
    ///
    /// A row left with one child collapses into that child (full width again);
    /// a group left empty is removed. The selection is cleared if it no longer
    /// resolves.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `id` is not in the tree.
    pub fn remove_field(&mut self, id: NodeId) -> Result<FieldNode, StoreError> {
        let removed = self.commit("remove", |fields| remove_node(fields, id).ok_or(StoreError::NodeNotFound(id)))?;
        self.heal_selection();
        Ok(removed)
    }

    /// Restore the previous snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(restored) = self.history.undo(&self.fields) else {
            return false;
        };
        self.fields = restored;
        self.heal_selection();
        true
    }

    /// Re-apply the next snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(restored) = self.history.redo(&self.fields) else {
            return false;
        };
        self.fields = restored;
        self.heal_selection();
        true
    }

    fn record_infallible(&mut self, label: &'static str, mutate: impl FnOnce(&mut Vec<FieldNode>)) {
        let staged = self.fields.clone();
        mutate(&mut self.fields);
        self.history.record_before_mutation(label, staged);
    }

    fn heal_selection(&mut self) {
        if let Some(id) = self.selected {
            if !doc::contains(&self.fields, id) {
                self.selected = None;
            }
        }
    }
}

fn remove_node(nodes: &mut Vec<FieldNode>, id: NodeId) -> Option<FieldNode> {
    if let Some(index) = doc::position(nodes, id) {
        return Some(nodes.remove(index));
    }
    for index in 0..nodes.len() {
        let is_row = nodes[index].is_row();
        let Some(children) = nodes[index].children.as_mut() else {
            continue;
        };
        let Some(removed) = remove_node(children, id) else {
            continue;
        };
        match children.len() {
            0 => {
                nodes.remove(index);
            }
            1 if is_row => {
                if let Some(mut only) = children.pop() {
                    only.layout_class = None;
                    nodes[index] = only;
                }
            }
            _ => {}
        }
        return Some(removed);
    }
    None
}
