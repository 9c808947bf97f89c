//! Uniform-grid broad phase over province bounding boxes.
//!
//! The pairwise sweep is quadratic in province count; on a continental map
//! almost all pairs are nowhere near each other. Bucketing each province's
//! (tolerance-expanded) box into grid cells and only pairing provinces that
//! share a cell prunes the sweep to geometrically plausible candidates
//! before any segment test runs.

use std::collections::{HashMap, HashSet};

use crate::geom::Bounds;

/// Buckets bounding boxes into square cells keyed by integer coordinates.
pub struct CellGrid {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl CellGrid {
    /// Creates a grid with the given cell edge length. Callers pick a size
    /// on the order of a typical province diagonal; non-positive sizes are
    /// clamped to 1.0.
    pub fn new(cell_size: f64) -> CellGrid {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        CellGrid {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Registers `index` in every cell its box covers.
    pub fn insert(&mut self, index: usize, bounds: Bounds) {
        let x0 = (bounds.min_x / self.cell_size).floor() as i64;
        let x1 = (bounds.max_x / self.cell_size).floor() as i64;
        let y0 = (bounds.min_y / self.cell_size).floor() as i64;
        let y1 = (bounds.max_y / self.cell_size).floor() as i64;
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    /// All index pairs that share at least one cell, each pair once with
    /// the smaller index first, sorted for deterministic downstream order.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut seen = HashSet::new();
        for members in self.cells.values() {
            for (k, &i) in members.iter().enumerate() {
                for &j in &members[k + 1..] {
                    let pair = if i < j { (i, j) } else { (j, i) };
                    seen.insert(pair);
                }
            }
        }
        let mut pairs: Vec<(usize, usize)> = seen.into_iter().collect();
        pairs.sort_unstable();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Bounds {
        Bounds {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    #[test]
    fn overlapping_boxes_become_candidates() {
        let mut grid = CellGrid::new(1.0);
        grid.insert(0, bounds(0.0, 0.0, 1.0, 1.0));
        grid.insert(1, bounds(0.9, 0.0, 2.0, 1.0));
        assert_eq!(grid.candidate_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn distant_boxes_are_pruned() {
        let mut grid = CellGrid::new(1.0);
        grid.insert(0, bounds(0.0, 0.0, 0.5, 0.5));
        grid.insert(1, bounds(10.0, 10.0, 10.5, 10.5));
        assert!(grid.candidate_pairs().is_empty());
    }

    #[test]
    fn pairs_are_unique_and_ordered() {
        // Boxes spanning several shared cells must still produce one pair.
        let mut grid = CellGrid::new(1.0);
        grid.insert(3, bounds(0.0, 0.0, 3.0, 3.0));
        grid.insert(1, bounds(0.0, 0.0, 3.0, 3.0));
        assert_eq!(grid.candidate_pairs(), vec![(1, 3)]);
    }

    #[test]
    fn boxes_touching_across_a_cell_line_share_the_boundary_cell() {
        let mut grid = CellGrid::new(1.0);
        // Both cover x = 2.0, landing them in cell column 2.
        grid.insert(0, bounds(1.0, 0.0, 2.0, 0.5));
        grid.insert(1, bounds(2.0, 0.0, 3.0, 0.5));
        assert_eq!(grid.candidate_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn non_positive_cell_size_is_clamped() {
        let mut grid = CellGrid::new(0.0);
        grid.insert(0, bounds(0.0, 0.0, 0.5, 0.5));
        grid.insert(1, bounds(0.25, 0.25, 0.75, 0.75));
        assert_eq!(grid.candidate_pairs(), vec![(0, 1)]);
    }
}
