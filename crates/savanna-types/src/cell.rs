//! Grid coordinates.
//!
//! A [`Cell`] is a 0-based `(x, y)` pair. Cells carry no knowledge of the
//! grid they live on; bounds are checked by `savanna_world::Grid`.
//!
//! Threshold comparisons in the simulation ("distance is exactly 1",
//! "distance is strictly between 1 and 2") go through
//! [`Cell::distance_squared`], which is exact integer arithmetic.
//! [`Cell::distance`] is provided for reporting and for callers that need
//! the Euclidean value itself.

use serde::{Deserialize, Serialize};

/// A position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl Cell {
    /// Create a cell from its column and row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`, computed exactly.
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(other.x).saturating_sub(i64::from(self.x));
        let dy = i64::from(other.y).saturating_sub(i64::from(self.y));
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Euclidean distance to `other`: `sqrt(dx^2 + dy^2)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// The cell shifted by `(dx, dy)`, or `None` if a coordinate overflows.
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self { x, y }),
            _ => None,
        }
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
