//! Drag model: the gesture state machine and the drop intents it resolves to.
//!
//! `DragState` tracks one drag gesture between its start and its drop or exit.
//! External drags (a field type pulled from the palette) carry the hovered
//! node and side; internal drags (moving an existing top-level node) carry the
//! source index and bypass side resolution entirely. This state is UI-local:
//! it never enters the store and never appears in history snapshots. Every
//! terminal event resets it to `Idle`.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::NodeId;
use crate::hit::{self, NodeBounds, Point, Rect};
use crate::layout::Side;

/// What a finished drag asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent {
    /// Full-width insert of a new field at `index` (empty space or past the last node).
    Insert { field_type: String, index: usize },
    /// Split beside an existing top-level node.
    Beside { field_type: String, target: NodeId, side: Side },
    /// Move an existing top-level node.
    Reorder { from: usize, to: usize },
}

/// The node and side an external drag is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hover {
    pub target: NodeId,
    pub side: Side,
}

/// State of the active drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A palette item is being dragged over the list.
    External {
        /// Palette type that will be created on drop.
        field_type: String,
        /// Hovered node and side, if over a node.
        hover: Option<Hover>,
    },
    /// An existing top-level node is being dragged to a new slot.
    Reordering {
        /// Index the node was picked up from.
        from: usize,
    },
}

impl DragState {
    /// Start dragging a palette item.
    pub fn begin_external(&mut self, field_type: impl Into<String>) {
        *self = Self::External { field_type: field_type.into(), hover: None };
    }

    /// Start dragging the top-level node at `from`.
    pub fn begin_reorder(&mut self, from: usize) {
        *self = Self::Reordering { from };
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Current beside-drop preview, if any.
    #[must_use]
    pub fn hover(&self) -> Option<Hover> {
        match self {
            Self::External { hover, .. } => *hover,
            _ => None,
        }
    }

    /// Pointer moved over a node. Only external drags resolve a side.
    ///
    /// Returns true when the hovered node or side changed, so callers can skip
    /// redundant updates for the stream of identical drag-over events.
    pub fn hover_node(&mut self, target: NodeId, rect: Rect, pointer_x: f64) -> bool {
        self.set_hover(Hover { target, side: hit::resolve_side(rect, pointer_x) })
    }

    /// Pointer moved to `pointer`; hit-test it against the laid-out node boxes.
    pub fn hover_at(&mut self, bounds: &[NodeBounds], pointer: Point) -> bool {
        match hit::hit_test(bounds, pointer) {
            Some((target, side)) => self.set_hover(Hover { target, side }),
            None => self.hover_empty(),
        }
    }

    fn set_hover(&mut self, next: Hover) -> bool {
        let Self::External { hover, .. } = self else {
            return false;
        };
        if *hover == Some(next) {
            return false;
        }
        *hover = Some(next);
        true
    }

    /// Pointer moved over empty list space. Returns true if a hover was cleared.
    pub fn hover_empty(&mut self) -> bool {
        let Self::External { hover, .. } = self else {
            return false;
        };
        hover.take().is_some()
    }

    /// The drag left the list without dropping.
    pub fn exit(&mut self) {
        *self = Self::Idle;
    }

    /// The drag ended on the list at slot `index` (as reported by the drag surface).
    ///
    /// Always resets to `Idle`. Returns `None` when there is nothing to do: no
    /// drag in progress, or a reorder onto its own slot.
    pub fn finish(&mut self, index: usize) -> Option<DropIntent> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::External { field_type, hover: Some(Hover { target, side }) } => {
                Some(DropIntent::Beside { field_type, target, side })
            }
            Self::External { field_type, hover: None } => Some(DropIntent::Insert { field_type, index }),
            Self::Reordering { from } if from == index => None,
            Self::Reordering { from } => Some(DropIntent::Reorder { from, to: index }),
        }
    }
}
