//! Map regions: an ordered province collection plus summary metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geom::Bounds;

use super::province::Province;

/// A complete map: identity, coordinate-system tag, bounds summary, and the
/// ordered province list.
///
/// `bounds` is a derived summary, never authoritative: it is recomputed from
/// the province boundaries whenever the province set changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapRegion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_coordinate_system")]
    pub coordinate_system: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "empty_bounds")]
    pub bounds: Bounds,
    pub provinces: Vec<Province>,
    /// Carried through untouched; the adjacency engine does not interpret
    /// sea zones or trade nodes.
    #[serde(default)]
    pub sea_zones: Vec<Value>,
    #[serde(default)]
    pub trade_nodes: Vec<Value>,
}

fn default_coordinate_system() -> String {
    "cartesian_2d".to_string()
}

fn default_unit() -> String {
    "game_units".to_string()
}

fn empty_bounds() -> Bounds {
    Bounds {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
    }
}

impl MapRegion {
    /// Creates an empty region with the standard coordinate-system tags.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> MapRegion {
        MapRegion {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            coordinate_system: default_coordinate_system(),
            unit: default_unit(),
            bounds: empty_bounds(),
            provinces: Vec::new(),
            sea_zones: Vec::new(),
            trade_nodes: Vec::new(),
        }
    }

    /// Recomputes `bounds` from every boundary point of every province,
    /// rounded to 2 decimals. A region with no boundary points keeps a
    /// zero box.
    pub fn recompute_bounds(&mut self) {
        let mut merged: Option<Bounds> = None;
        for province in &self.provinces {
            if let Some(b) = province.bounds() {
                match merged.as_mut() {
                    Some(m) => m.merge(b),
                    None => merged = Some(b),
                }
            }
        }
        self.bounds = merged.map(Bounds::rounded).unwrap_or_else(empty_bounds);
    }

    /// Looks up a province by id.
    pub fn province(&self, id: u32) -> Option<&Province> {
        self.provinces.iter().find(|p| p.id == id)
    }
}
