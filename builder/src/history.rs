//! Undo/redo history over whole-tree snapshots.
//!
//! DESIGN
//! ======
//! Every store mutation hands the history a deep snapshot of the top-level list
//! taken before the mutation. Undo pushes the live list onto the redo stack and
//! returns the newest undo entry; redo is symmetric. There is no diffing: each
//! entry is a full, independent copy that is never aliased with live state.
//!
//! ```text
//! record(s1) record(s2) record(s3)
//!   undo: [s1, s2, s3]   redo: []
//! undo() x2
//!   undo: [s1]           redo: [live3, live2]
//! record(s4)             <-- fresh edit drops the redo branch
//!   undo: [s1, s4]       redo: []
//! ```
//!
//! Depth is bounded by `limit`; the oldest entry is evicted first.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::DEFAULT_HISTORY_LIMIT;
use crate::doc::FieldNode;

/// An immutable snapshot of the top-level list plus the operation that produced it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Name of the store operation this snapshot precedes.
    pub label: &'static str,
    /// Deep copy of the top-level list.
    pub fields: Vec<FieldNode>,
}

/// Dual-stack undo/redo manager.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` undo entries.
    /// `usize::MAX` keeps everything.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { undo_stack: VecDeque::new(), redo_stack: VecDeque::new(), limit }
    }

    /// Create a history with no depth bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Label of the entry `undo` would restore.
    #[must_use]
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo_stack.back().map(|e| e.label)
    }

    /// Label of the entry `redo` would restore.
    #[must_use]
    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo_stack.back().map(|e| e.label)
    }

    /// Record the pre-mutation snapshot of an operation and drop the redo branch.
    pub fn record_before_mutation(&mut self, label: &'static str, snapshot: Vec<FieldNode>) {
        self.undo_stack.push_back(HistoryEntry { label, fields: snapshot });
        self.redo_stack.clear();
        self.enforce_limit();
        tracing::debug!(op = label, depth = self.undo_stack.len(), "history recorded");
    }

    /// Step back. Returns the list to restore, or `None` when there is nothing to undo.
    ///
    /// `current` is the live list; a deep copy of it goes onto the redo stack.
    pub fn undo(&mut self, current: &[FieldNode]) -> Option<Vec<FieldNode>> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(HistoryEntry { label: entry.label, fields: current.to_vec() });
        tracing::debug!(op = entry.label, undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undo");
        Some(entry.fields)
    }

    /// Step forward. Returns the list to restore, or `None` when there is nothing to redo.
    pub fn redo(&mut self, current: &[FieldNode]) -> Option<Vec<FieldNode>> {
        let entry = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(HistoryEntry { label: entry.label, fields: current.to_vec() });
        self.enforce_limit();
        tracing::debug!(op = entry.label, undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redo");
        Some(entry.fields)
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }
}
