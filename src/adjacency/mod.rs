//! The adjacency-detection engine.
//!
//! Given a map of polygon-bounded provinces, decides which pairs share a
//! border, measures the shared length, and writes a bidirectional neighbor
//! graph back into the provinces. All geometric comparisons run under a
//! per-map tolerance derived from the map's own province sizes.
//!
//! The engine annotates; it never renames or re-identifies provinces, and
//! the only field it mutates is each province's neighbor list.

pub mod border;
pub mod builder;
pub mod grid;
pub mod tolerance;

pub use border::{border_length, boundaries_touch};
pub use builder::{build_adjacency, build_map_adjacency, AdjacencySummary};
pub use grid::CellGrid;
pub use tolerance::{adaptive_tolerance, FALLBACK_TOLERANCE, TOLERANCE_RATIO};
