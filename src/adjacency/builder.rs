//! Pairwise province sweep and neighbor graph assembly.
//!
//! Candidate pairs come from the broad-phase grid, are confirmed by the
//! quick touch check, and only then pay for the exhaustive border-length
//! accumulation. Candidates are evaluated in parallel; each worker returns
//! `(i, j, length)` hits into a collected buffer that is merged into the
//! neighbor lists in one sequential step, so the hot loop takes no locks
//! and the output order is deterministic.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::geom::{round2, Bounds};
use crate::map::{MapRegion, Neighbor, Province};

use super::border::{border_length, boundaries_touch};
use super::grid::CellGrid;
use super::tolerance::adaptive_tolerance;

/// Diagnostics from one adjacency pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencySummary {
    /// Tolerance the pass ran under.
    pub tolerance: f64,
    /// Number of unordered province pairs registered as neighbors.
    pub adjacency_count: usize,
    /// Largest neighbor count of any single province.
    pub max_neighbors: usize,
    /// Provinces left with zero neighbors. Islands and exclaves are
    /// expected here; this is a warning, never an error.
    pub isolated: Vec<u32>,
    /// Provinces excluded for having fewer than 3 boundary points.
    pub invalid_boundaries: Vec<u32>,
}

/// Runs a full adjacency pass over a map, deriving the tolerance from the
/// map's own province sizes.
pub fn build_map_adjacency(region: &mut MapRegion) -> AdjacencySummary {
    let tolerance = adaptive_tolerance(&region.provinces);
    build_adjacency(&mut region.provinces, tolerance)
}

/// Runs a full adjacency pass under an explicit tolerance.
///
/// Every province's neighbor list is cleared up front and fully recomputed;
/// prior neighbor state never survives a pass.
pub fn build_adjacency(provinces: &mut [Province], tolerance: f64) -> AdjacencySummary {
    for province in provinces.iter_mut() {
        province.neighbors.clear();
    }

    let mut invalid_boundaries = Vec::new();
    let mut boxes: Vec<Option<Bounds>> = vec![None; provinces.len()];
    for (i, province) in provinces.iter().enumerate() {
        if province.has_valid_boundary() {
            boxes[i] = province.bounds();
        } else {
            warn!(
                id = province.id,
                name = %province.name,
                points = province.boundary.len(),
                "skipping province with invalid boundary"
            );
            invalid_boundaries.push(province.id);
        }
    }

    // Broad phase: bucket tolerance-expanded boxes into cells sized like a
    // typical province, so only geometrically plausible pairs go on.
    let mut diagonals: Vec<f64> = boxes
        .iter()
        .flatten()
        .map(|b| b.diagonal())
        .collect();
    diagonals.sort_by(|a, b| a.total_cmp(b));
    let cell_size = diagonals.get(diagonals.len() / 2).copied().unwrap_or(1.0);

    let mut grid = CellGrid::new(cell_size);
    for (i, bounds) in boxes.iter().enumerate() {
        if let Some(b) = bounds {
            grid.insert(i, b.expanded(tolerance));
        }
    }

    let provinces_ref: &[Province] = provinces;
    let boxes_ref: &[Option<Bounds>] = &boxes;
    let hits: Vec<(usize, usize, f64)> = grid
        .candidate_pairs()
        .par_iter()
        .filter_map(|&(i, j)| {
            let (box_a, box_b) = match (boxes_ref[i], boxes_ref[j]) {
                (Some(a), Some(b)) => (a, b),
                _ => return None,
            };
            if !box_a.expanded(tolerance).overlaps(box_b.expanded(tolerance)) {
                return None;
            }

            let a = &provinces_ref[i].boundary;
            let b = &provinces_ref[j].boundary;
            // Quick check before the exhaustive accumulation; unrelated
            // pairs bail out on the first non-touching sweep.
            if !boundaries_touch(a, b, tolerance) {
                return None;
            }

            let length = border_length(a, b, tolerance);
            // Strictly greater: a pair measuring exactly the tolerance is
            // treated as noise, not a border.
            if length > tolerance {
                Some((i, j, round2(length)))
            } else {
                None
            }
        })
        .collect();

    for &(i, j, length) in &hits {
        let id_i = provinces[i].id;
        let id_j = provinces[j].id;
        provinces[i].neighbors.push(Neighbor {
            id: id_j,
            border_length: length,
        });
        provinces[j].neighbors.push(Neighbor {
            id: id_i,
            border_length: length,
        });
    }

    let mut max_neighbors = 0;
    let mut isolated = Vec::new();
    for province in provinces.iter() {
        max_neighbors = max_neighbors.max(province.neighbors.len());
        if province.neighbors.is_empty() {
            isolated.push(province.id);
        }
    }

    info!(
        tolerance,
        adjacencies = hits.len(),
        max_neighbors,
        isolated = isolated.len(),
        "adjacency pass complete"
    );
    if !isolated.is_empty() {
        warn!(count = isolated.len(), "provinces with no neighbors");
    }

    AdjacencySummary {
        tolerance,
        adjacency_count: hits.len(),
        max_neighbors,
        isolated,
        invalid_boundaries,
    }
}
