//! Demarc -- province map preparation for strategy games.
//!
//! Exposes the geometry primitives, the adjacency-detection engine, map
//! merging, and the map-file and GeoJSON collaborators for use by
//! integration tests and the binary entry point.

pub mod adjacency;
pub mod format;
pub mod geojson;
pub mod geom;
pub mod map;
pub mod merge;
