//! Map file I/O.
//!
//! Maps are persisted as JSON with a single `map_region` object at the top
//! level. Structural problems (unreadable file, malformed JSON, missing
//! `map_region`, empty province list) are reported here, before the
//! adjacency engine ever sees the map; the engine itself does no file I/O.
//!
//! Saving over an existing map writes a one-time `.json.backup` sibling
//! first, so the pre-tooling version of a hand-edited file survives.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::map::MapRegion;

/// Top-level map file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapFile {
    pub map_region: MapRegion,
}

/// Errors from loading or saving map files.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed map file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("map file {path} contains no provinces")]
    NoProvinces { path: PathBuf },
}

/// Loads and structurally validates a map file.
pub fn load_map(path: &Path) -> Result<MapRegion, FormatError> {
    let text = fs::read_to_string(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: MapFile = serde_json::from_str(&text).map_err(|source| FormatError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    if file.map_region.provinces.is_empty() {
        return Err(FormatError::NoProvinces {
            path: path.to_path_buf(),
        });
    }
    Ok(file.map_region)
}

/// Saves a map as pretty-printed JSON.
///
/// When `backup` is set and no `.json.backup` sibling exists yet, the
/// current file content is copied there before being overwritten. An
/// existing backup is never replaced.
pub fn save_map(path: &Path, region: &MapRegion, backup: bool) -> Result<(), FormatError> {
    if backup && path.exists() {
        let backup_path = backup_path_for(path);
        if !backup_path.exists() {
            fs::copy(path, &backup_path).map_err(|source| FormatError::Write {
                path: backup_path.clone(),
                source,
            })?;
            info!(backup = %backup_path.display(), "created map backup");
        }
    }

    let file = MapFile {
        map_region: region.clone(),
    };
    let text = serde_json::to_string_pretty(&file).map_err(|source| FormatError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| FormatError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// `map_france.json` -> `map_france.json.backup`.
fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".backup");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::map::Province;

    const MINIMAL_MAP: &str = r#"{
        "map_region": {
            "id": "test_region",
            "name": "Test Region",
            "provinces": [
                {
                    "id": 100,
                    "name": "Alpha",
                    "boundary": [
                        {"x": 0.0, "y": 0.0},
                        {"x": 1.0, "y": 0.0},
                        {"x": 0.5, "y": 1.0}
                    ]
                }
            ]
        }
    }"#;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("demarc-{}-{}", std::process::id(), name))
    }

    #[test]
    fn load_minimal_map() {
        let path = temp_path("minimal.json");
        fs::write(&path, MINIMAL_MAP).unwrap();
        let region = load_map(&path).unwrap();
        assert_eq!(region.id, "test_region");
        assert_eq!(region.provinces.len(), 1);
        assert_eq!(region.provinces[0].boundary.len(), 3);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_map_region_is_malformed() {
        let path = temp_path("bad.json");
        fs::write(&path, r#"{"provinces": []}"#).unwrap();
        match load_map(&path) {
            Err(FormatError::Malformed { .. }) => {}
            other => panic!("expected Malformed, got {:?}", other.map(|r| r.id)),
        }
        fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_province_list_is_rejected() {
        let path = temp_path("empty.json");
        fs::write(
            &path,
            r#"{"map_region": {"id": "x", "name": "X", "provinces": []}}"#,
        )
        .unwrap();
        assert!(matches!(load_map(&path), Err(FormatError::NoProvinces { .. })));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = temp_path("does-not-exist.json");
        assert!(matches!(load_map(&path), Err(FormatError::Read { .. })));
    }

    #[test]
    fn save_and_reload_round_trips() {
        let path = temp_path("roundtrip.json");
        let mut region = MapRegion::new("rt", "Round Trip");
        region.provinces.push(Province::new(
            100,
            "Alpha",
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.5, 1.0)],
        ));
        region.recompute_bounds();

        save_map(&path, &region, false).unwrap();
        let reloaded = load_map(&path).unwrap();
        assert_eq!(reloaded.id, region.id);
        assert_eq!(reloaded.provinces[0].name, "Alpha");
        assert_eq!(reloaded.bounds, region.bounds);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn backup_is_written_once_and_kept() {
        let path = temp_path("backed-up.json");
        let backup = temp_path("backed-up.json.backup");
        fs::remove_file(&backup).ok();
        fs::write(&path, MINIMAL_MAP).unwrap();

        let mut region = load_map(&path).unwrap();
        region.name = "First Save".to_string();
        save_map(&path, &region, true).unwrap();
        let backed_up = fs::read_to_string(&backup).unwrap();
        assert!(backed_up.contains("Test Region"), "backup holds the original");

        region.name = "Second Save".to_string();
        save_map(&path, &region, true).unwrap();
        let backed_up = fs::read_to_string(&backup).unwrap();
        assert!(
            backed_up.contains("Test Region"),
            "existing backup must not be overwritten"
        );

        fs::remove_file(&path).ok();
        fs::remove_file(&backup).ok();
    }
}
