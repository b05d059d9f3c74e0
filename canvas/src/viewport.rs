#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

/// A point in either client (viewport) or surface-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Top-left corner of the surface element in client coordinates, as
/// reported by `Element.getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
}

impl SurfaceRect {
    #[must_use]
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Convert a client-space point to surface-local coordinates.
    ///
    /// No scaling is applied: the element is expected to be laid out at its
    /// intrinsic pixel size.
    #[must_use]
    pub fn client_to_local(&self, client: Point) -> Point {
        Point { x: client.x - self.left, y: client.y - self.top }
    }
}
