//! GeoJSON import: real geographic boundaries to game maps.
//!
//! Takes a GeoJSON FeatureCollection in lon/lat degrees and produces a
//! `MapRegion` in game coordinates: a fixed affine projection of the Europe
//! window onto the square game world, boundary decimation to keep polygons
//! tractable, and province records filled with gameplay defaults for later
//! hand-editing.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::geom::{round2, Point};
use crate::map::{MapRegion, Province};

/// Geographic window covered by the projection, in degrees.
pub const EUROPE_MIN_LAT: f64 = 35.0;
pub const EUROPE_MAX_LAT: f64 = 72.0;
pub const EUROPE_MIN_LON: f64 = -15.0;
pub const EUROPE_MAX_LON: f64 = 45.0;

/// Side length of the square game world; coordinates span -500..+500.
pub const GAME_WORLD_SIZE: f64 = 1000.0;

/// Boundaries longer than this are decimated on import.
pub const MAX_BOUNDARY_POINTS: usize = 50;

/// First province id handed out by the importer.
const IMPORT_ID_BASE: u32 = 100;

/// Affine lat/lon to game-coordinate projection.
///
/// Maps the configured degree window onto the game world with the Y axis
/// flipped (north is negative y). Output is rounded to 2 decimals like all
/// persisted coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub world_size: f64,
}

impl Default for Projection {
    fn default() -> Projection {
        Projection {
            min_lat: EUROPE_MIN_LAT,
            max_lat: EUROPE_MAX_LAT,
            min_lon: EUROPE_MIN_LON,
            max_lon: EUROPE_MAX_LON,
            world_size: GAME_WORLD_SIZE,
        }
    }
}

impl Projection {
    pub fn to_game(&self, latitude: f64, longitude: f64) -> Point {
        let lat_norm = (latitude - self.min_lat) / (self.max_lat - self.min_lat);
        let lon_norm = (longitude - self.min_lon) / (self.max_lon - self.min_lon);

        let x = lon_norm * self.world_size - self.world_size / 2.0;
        let y = self.world_size / 2.0 - lat_norm * self.world_size;
        Point::new(round2(x), round2(y))
    }
}

/// Import settings; `new` fills the gameplay defaults from the region id.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub region_id: String,
    pub owner: String,
    pub culture: String,
    pub religion: String,
    pub simplify: bool,
}

impl ImportOptions {
    pub fn new(region_id: impl Into<String>) -> ImportOptions {
        let region_id = region_id.into();
        ImportOptions {
            owner: region_id.clone(),
            culture: String::new(),
            religion: String::new(),
            region_id,
            simplify: true,
        }
    }
}

/// Errors from GeoJSON import.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("malformed GeoJSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no polygon features found")]
    NoPolygons,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
    #[serde(default)]
    geometry: Value,
}

/// Converts a GeoJSON FeatureCollection into a game map region.
///
/// Polygon features contribute their outer ring; MultiPolygon features
/// contribute the outer ring of their largest polygon. Features with other
/// geometry types are skipped with a warning.
pub fn import_geojson(text: &str, options: &ImportOptions) -> Result<MapRegion, GeoJsonError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    let projection = Projection::default();

    let mut region = MapRegion::new(options.region_id.clone(), title_case(&options.region_id));
    region.description = format!("Real geographic boundaries for {}", options.region_id);

    let mut next_id = IMPORT_ID_BASE;
    for feature in collection.features {
        let Some(ring) = outer_ring(&feature.geometry) else {
            let kind = feature.geometry.get("type").and_then(Value::as_str);
            warn!(geometry = kind.unwrap_or("missing"), "skipping non-polygon feature");
            continue;
        };
        if ring.is_empty() {
            continue;
        }

        // GeoJSON positions are [lon, lat].
        let mut boundary: Vec<Point> = ring
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| projection.to_game(position[1], position[0]))
            .collect();

        if options.simplify && boundary.len() > MAX_BOUNDARY_POINTS {
            boundary = decimate(boundary, MAX_BOUNDARY_POINTS);
        }

        let name = feature_name(&feature.properties)
            .unwrap_or_else(|| format!("Province {}", next_id));

        let mut province = Province::new(next_id, name, boundary);
        province.owner_realm = options.owner.clone();
        province.culture = options.culture.clone();
        province.religion = options.religion.clone();
        province.center = polygon_center(&province.boundary);
        region.provinces.push(province);
        next_id += 1;
    }

    if region.provinces.is_empty() {
        return Err(GeoJsonError::NoPolygons);
    }

    region.recompute_bounds();
    Ok(region)
}

/// Outer ring of a Polygon, or of the largest polygon in a MultiPolygon.
fn outer_ring(geometry: &Value) -> Option<Vec<Vec<f64>>> {
    let kind = geometry.get("type")?.as_str()?;
    let coordinates = geometry.get("coordinates")?;
    match kind {
        "Polygon" => {
            let rings: Vec<Vec<Vec<f64>>> =
                serde_json::from_value(coordinates.clone()).ok()?;
            rings.into_iter().next()
        }
        "MultiPolygon" => {
            let polygons: Vec<Vec<Vec<Vec<f64>>>> =
                serde_json::from_value(coordinates.clone()).ok()?;
            polygons
                .into_iter()
                .max_by_key(|polygon| polygon.first().map_or(0, Vec::len))
                .and_then(|polygon| polygon.into_iter().next())
        }
        _ => None,
    }
}

/// Stride decimation keeping the final point, so closed rings stay closed.
fn decimate(points: Vec<Point>, max_points: usize) -> Vec<Point> {
    if points.len() <= max_points {
        return points;
    }
    let step = points.len() / max_points;
    let last = points[points.len() - 1];
    let mut decimated: Vec<Point> = points.into_iter().step_by(step).collect();
    if decimated.last() != Some(&last) {
        decimated.push(last);
    }
    decimated
}

/// Mean of the boundary points, rounded like persisted coordinates.
fn polygon_center(boundary: &[Point]) -> Option<Point> {
    if boundary.is_empty() {
        return None;
    }
    let count = boundary.len() as f64;
    let sum_x: f64 = boundary.iter().map(|p| p.x).sum();
    let sum_y: f64 = boundary.iter().map(|p| p.y).sum();
    Some(Point::new(round2(sum_x / count), round2(sum_y / count)))
}

/// Display name from feature properties; datasets disagree on the key.
fn feature_name(properties: &serde_json::Map<String, Value>) -> Option<String> {
    ["name", "nom", "NAME"]
        .iter()
        .find_map(|key| properties.get(*key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `western_europe` -> `Western Europe`.
fn title_case(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
