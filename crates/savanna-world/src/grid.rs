//! The bounded simulation grid.
//!
//! Two bounds checks exist. [`Grid::in_bounds`] is the exclusive check used
//! for anything an agent can step onto. [`Grid::in_scan_bounds`] accepts one
//! extra column and row past the far edges; vision and pairing scans use it.
//! Nothing ever stands on the margin, so the only effect is that scans visit
//! a few empty cells.

use savanna_types::Cell;
use serde::Serialize;

use crate::error::WorldError;

/// Offsets of the Moore neighborhood in row-major order.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A `width` x `height` board of cells indexed from `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: i32,
    height: i32,
    capacity: usize,
}

impl Grid {
    /// Build a grid. Both dimensions must be positive.
    pub fn new(width: i32, height: i32) -> Result<Self, WorldError> {
        if width <= 0 || height <= 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        let cells = i64::from(width)
            .checked_mul(i64::from(height))
            .ok_or(WorldError::ArithmeticOverflow)?;
        let capacity = usize::try_from(cells).map_err(|_e| WorldError::ArithmeticOverflow)?;
        Ok(Self {
            width,
            height,
            capacity,
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells, `width * height`.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// `0 <= x < width && 0 <= y < height`.
    pub const fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// `0 <= x <= width && 0 <= y <= height`.
    pub const fn in_scan_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x <= self.width && cell.y >= 0 && cell.y <= self.height
    }

    /// Euclidean distance between two cells.
    pub fn distance(a: Cell, b: Cell) -> f64 {
        a.distance(b)
    }

    /// The up to eight in-bounds cells touching `cell`, row-major.
    pub fn moore_neighbors(&self, cell: Cell) -> Vec<Cell> {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|c| self.in_bounds(*c))
            .collect()
    }

    /// Every cell within Chebyshev distance `radius` of `cell`, excluding
    /// `cell` itself, row-major and filtered by [`Grid::in_scan_bounds`].
    pub fn square_neighborhood(&self, cell: Cell, radius: i32) -> Vec<Cell> {
        let radius = radius.max(0);
        let low = 0_i32.saturating_sub(radius);
        let mut cells = Vec::new();
        for dy in low..=radius {
            for dx in low..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(c) = cell.offset(dx, dy)
                    && self.in_scan_bounds(c)
                {
                    cells.push(c);
                }
            }
        }
        cells
    }

    /// All in-bounds cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn grid(w: i32, h: i32) -> Grid {
        Grid::new(w, h).unwrap()
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(WorldError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(Grid::new(5, -1).is_err());
    }

    #[test]
    fn capacity_is_area() {
        assert_eq!(grid(60, 25).capacity(), 1500);
        assert_eq!(grid(2, 2).capacity(), 4);
    }

    #[test]
    fn in_bounds_is_exclusive() {
        let g = grid(5, 5);
        assert!(g.in_bounds(Cell::new(0, 0)));
        assert!(g.in_bounds(Cell::new(4, 4)));
        assert!(!g.in_bounds(Cell::new(5, 4)));
        assert!(!g.in_bounds(Cell::new(-1, 0)));
    }

    #[test]
    fn scan_bounds_include_far_margin() {
        let g = grid(5, 5);
        assert!(g.in_scan_bounds(Cell::new(5, 5)));
        assert!(!g.in_scan_bounds(Cell::new(6, 0)));
        assert!(!g.in_scan_bounds(Cell::new(0, -1)));
    }

    #[test]
    fn moore_neighbors_interior_row_major() {
        let n = grid(5, 5).moore_neighbors(Cell::new(2, 2));
        assert_eq!(
            n,
            vec![
                Cell::new(1, 1),
                Cell::new(2, 1),
                Cell::new(3, 1),
                Cell::new(1, 2),
                Cell::new(3, 2),
                Cell::new(1, 3),
                Cell::new(2, 3),
                Cell::new(3, 3),
            ]
        );
    }

    #[test]
    fn moore_neighbors_clipped_at_corner() {
        let g = grid(5, 5);
        assert_eq!(
            g.moore_neighbors(Cell::new(0, 0)),
            vec![Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
        assert_eq!(g.moore_neighbors(Cell::new(4, 4)).len(), 3);
    }

    #[test]
    fn square_neighborhood_size() {
        let g = grid(20, 20);
        assert_eq!(g.square_neighborhood(Cell::new(10, 10), 2).len(), 24);
        assert_eq!(g.square_neighborhood(Cell::new(10, 10), 4).len(), 80);
        assert!(g.square_neighborhood(Cell::new(10, 10), 0).is_empty());
    }

    #[test]
    fn square_neighborhood_uses_scan_margin() {
        let g = grid(5, 5);
        let n = g.square_neighborhood(Cell::new(4, 4), 1);
        // (3..=5) x (3..=5) minus the centre, all inside the scan margin.
        assert_eq!(n.len(), 8);
        assert!(n.contains(&Cell::new(5, 5)));
        assert_eq!(n[0], Cell::new(3, 3));
    }

    #[test]
    fn cells_enumerates_every_cell_once() {
        let g = grid(3, 2);
        let all: Vec<Cell> = g.cells().collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], Cell::new(0, 0));
        assert_eq!(all[5], Cell::new(2, 1));
    }
}
