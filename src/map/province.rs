//! Province records.
//!
//! Mirrors the persisted map schema: identity and gameplay metadata plus the
//! polygon boundary. Gameplay fields default when absent so partially
//! specified records still load. The `neighbors` list is owned by the
//! adjacency builder: it is cleared and fully recomputed on every pass,
//! never patched incrementally.

use serde::{Deserialize, Serialize};

use crate::geom::{Bounds, Point};

/// A registered adjacency to another province.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: u32,
    /// Shared border length in game units, rounded to 2 decimal places.
    pub border_length: f64,
}

/// A polygon-bounded game region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Province {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub owner_realm: String,
    #[serde(default = "default_terrain")]
    pub terrain_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point>,
    #[serde(default = "default_base")]
    pub base_tax: u32,
    #[serde(default = "default_base")]
    pub base_production: u32,
    #[serde(default = "default_base")]
    pub base_manpower: u32,
    #[serde(default = "default_development")]
    pub development: u32,
    /// Closed polygon outline: edge i connects `boundary[i]` to
    /// `boundary[(i + 1) % len]`. Fewer than 3 points is invalid geometry.
    pub boundary: Vec<Point>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_trade_goods")]
    pub trade_goods: String,
    #[serde(default)]
    pub culture: String,
    #[serde(default)]
    pub religion: String,
    #[serde(default = "default_climate")]
    pub climate: String,
    #[serde(default)]
    pub neighbors: Vec<Neighbor>,
    /// Pre-merge id retained as provenance; never used for lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<u32>,
}

fn default_terrain() -> String {
    "plains".to_string()
}

fn default_base() -> u32 {
    5
}

fn default_development() -> u32 {
    15
}

fn default_trade_goods() -> String {
    "grain".to_string()
}

fn default_climate() -> String {
    "temperate".to_string()
}

impl Province {
    /// Creates a province with the given boundary and default gameplay
    /// metadata.
    pub fn new(id: u32, name: impl Into<String>, boundary: Vec<Point>) -> Province {
        Province {
            id,
            name: name.into(),
            owner_realm: String::new(),
            terrain_type: default_terrain(),
            center: None,
            base_tax: default_base(),
            base_production: default_base(),
            base_manpower: default_base(),
            development: default_development(),
            boundary,
            features: Vec::new(),
            trade_goods: default_trade_goods(),
            culture: String::new(),
            religion: String::new(),
            climate: default_climate(),
            neighbors: Vec::new(),
            source_id: None,
        }
    }

    /// A boundary needs at least 3 points to enclose area; anything shorter
    /// is excluded from adjacency computation.
    pub fn has_valid_boundary(&self) -> bool {
        self.boundary.len() >= 3
    }

    /// Axis-aligned box around the boundary, `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.boundary)
    }
}
