//! Merging independently produced maps into one combined map.
//!
//! Sources are concatenated in merge order, each province renumbered to a
//! new globally unique sequential id (source order preserved within each
//! map). The adjacency pass then runs once over the full merged set, so
//! borders crossing the seam between sources are discovered; running it
//! per source map would miss exactly those.

use tracing::info;

use crate::adjacency::{build_map_adjacency, AdjacencySummary};
use crate::map::MapRegion;

/// First id handed out when renumbering merged provinces.
pub const MERGE_ID_BASE: u32 = 100;

/// Concatenates `sources` into a single region and recomputes the combined
/// neighbor graph.
///
/// Each province's pre-merge id is kept in `source_id` as provenance; all
/// identity and lookups use the new sequential ids.
pub fn merge_regions(
    sources: Vec<MapRegion>,
    id: impl Into<String>,
    name: impl Into<String>,
    description: impl Into<String>,
) -> (MapRegion, AdjacencySummary) {
    let mut combined = MapRegion::new(id, name);
    combined.description = description.into();

    let mut next_id = MERGE_ID_BASE;
    for source in sources {
        let count = source.provinces.len();
        for mut province in source.provinces {
            province.source_id = Some(province.id);
            province.id = next_id;
            next_id += 1;
            combined.provinces.push(province);
        }
        info!(source = %source.id, provinces = count, "merged source map");
    }

    combined.recompute_bounds();
    let summary = build_map_adjacency(&mut combined);
    (combined, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::map::Province;

    fn square(id: u32, x0: f64, y0: f64, size: f64) -> Province {
        Province::new(
            id,
            format!("p{}", id),
            vec![
                Point::new(x0, y0),
                Point::new(x0 + size, y0),
                Point::new(x0 + size, y0 + size),
                Point::new(x0, y0 + size),
            ],
        )
    }

    fn single_province_map(id: &str, province: Province) -> MapRegion {
        let mut region = MapRegion::new(id, id);
        region.provinces.push(province);
        region.recompute_bounds();
        region
    }

    #[test]
    fn renumbering_is_sequential_in_merge_order() {
        let a = single_province_map("a", square(500, 0.0, 0.0, 1.0));
        let mut b = MapRegion::new("b", "b");
        b.provinces.push(square(500, 10.0, 0.0, 1.0));
        b.provinces.push(square(501, 20.0, 0.0, 1.0));

        let (combined, _) = merge_regions(vec![a, b], "ab", "AB", "");
        let ids: Vec<u32> = combined.provinces.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
        let sources: Vec<Option<u32>> =
            combined.provinces.iter().map(|p| p.source_id).collect();
        assert_eq!(sources, vec![Some(500), Some(500), Some(501)]);
    }

    #[test]
    fn seam_adjacency_is_discovered_after_merge() {
        // Each source map alone has a single, necessarily isolated
        // province; only the merged pass can see across the seam.
        let a = single_province_map("west", square(1, 0.0, 0.0, 1.0));
        let b = single_province_map("east", square(1, 1.0, 0.0, 1.0));

        let (combined, summary) = merge_regions(vec![a, b], "both", "Both", "seam test");
        assert_eq!(summary.adjacency_count, 1);
        assert_eq!(combined.provinces[0].neighbors[0].id, 101);
        assert_eq!(combined.provinces[1].neighbors[0].id, 100);
        assert_eq!(combined.provinces[0].neighbors[0].border_length, 1.0);
    }

    #[test]
    fn combined_bounds_cover_all_sources() {
        let a = single_province_map("a", square(1, 0.0, 0.0, 1.0));
        let b = single_province_map("b", square(1, 10.0, -5.0, 2.0));

        let (combined, _) = merge_regions(vec![a, b], "ab", "AB", "");
        assert_eq!(combined.bounds.min_x, 0.0);
        assert_eq!(combined.bounds.max_x, 12.0);
        assert_eq!(combined.bounds.min_y, -5.0);
        assert_eq!(combined.bounds.max_y, 1.0);
    }

    #[test]
    fn merge_of_nothing_is_empty_and_trivial() {
        let (combined, summary) = merge_regions(Vec::new(), "none", "None", "");
        assert!(combined.provinces.is_empty());
        assert_eq!(summary.adjacency_count, 0);
    }
}
