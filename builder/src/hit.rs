#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::NodeId;
use crate::layout::Side;

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a rendered node, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Horizontal midpoint.
    #[must_use]
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Whether `pt` lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }
}

/// Laid-out box of one top-level node, as reported by the drag surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBounds {
    pub id: NodeId,
    pub rect: Rect,
}

/// Which half of `rect` the pointer is over. Left of the midpoint is `Left`;
/// the midpoint itself and beyond is `Right`.
#[must_use]
pub fn resolve_side(rect: Rect, pointer_x: f64) -> Side {
    if pointer_x < rect.mid_x() { Side::Left } else { Side::Right }
}

/// Find the node under `pointer` and the side it is on.
///
/// Returns `None` over empty list space.
#[must_use]
pub fn hit_test(bounds: &[NodeBounds], pointer: Point) -> Option<(NodeId, Side)> {
    bounds
        .iter()
        .find(|b| b.rect.contains(pointer))
        .map(|b| (b.id, resolve_side(b.rect, pointer.x)))
}
