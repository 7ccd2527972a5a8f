//! Layout composer for beside-drops.
//!
//! Given a target node in the top-level list, a new node, and a side, compute
//! the next top-level list: either extend the target row, or wrap the target
//! and the new node into a fresh two-column row. The input list is never
//! mutated; the caller swaps in the returned list.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::{Deserialize, Serialize};

use crate::consts::COL_SPAN_HALF;
use crate::doc::{self, FieldNode, NodeId};

/// Which side of the target the new node lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The target is not a top-level node of the list.
    #[error("target node not found in top-level list: {0}")]
    TargetNotFound(NodeId),
}

/// Compose the top-level list for dropping `new_node` beside `target`.
///
/// # Errors
///
/// Returns `TargetNotFound` if `target` is not a top-level node of `fields`.
pub fn compose_beside(
    fields: &[FieldNode],
    target: NodeId,
    mut new_node: FieldNode,
    side: Side,
) -> Result<Vec<FieldNode>, LayoutError> {
    let index = doc::position(fields, target).ok_or(LayoutError::TargetNotFound(target))?;
    let mut next = fields.to_vec();
    new_node.layout_class = Some(COL_SPAN_HALF.to_owned());

    let slot = &mut next[index];
    if slot.is_row() {
        if let Some(children) = slot.children.as_mut() {
            match side {
                Side::Left => children.insert(0, new_node),
                Side::Right => children.push(new_node),
            }
        }
    } else {
        let mut existing = slot.clone();
        existing.layout_class = Some(COL_SPAN_HALF.to_owned());
        *slot = match side {
            Side::Left => FieldNode::row(new_node, existing),
            Side::Right => FieldNode::row(existing, new_node),
        };
    }
    Ok(next)
}
