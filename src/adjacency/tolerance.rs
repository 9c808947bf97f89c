//! Adaptive tolerance selection.
//!
//! Digitized boundaries never line up exactly, so every geometric
//! comparison runs under a numeric slack. The slack is a property of the
//! map being processed: it is derived from that map's own province size
//! distribution and never reused across maps.

use tracing::debug;

use crate::map::Province;

/// Tolerance used when no province has a usable boundary.
pub const FALLBACK_TOLERANCE: f64 = 1.0;

/// Fraction of the median province diagonal used as tolerance.
pub const TOLERANCE_RATIO: f64 = 0.005;

/// Derives the tolerance for one adjacency pass over `provinces`.
///
/// Takes the bounding-box diagonal of every province with a valid boundary,
/// then 0.5% of the median diagonal. The median (lower-middle element for
/// even counts) keeps a few continent-sized or sliver provinces from
/// skewing the slack.
pub fn adaptive_tolerance(provinces: &[Province]) -> f64 {
    let mut diagonals: Vec<f64> = provinces
        .iter()
        .filter(|p| p.has_valid_boundary())
        .filter_map(|p| p.bounds())
        .map(|b| b.diagonal())
        .collect();

    if diagonals.is_empty() {
        return FALLBACK_TOLERANCE;
    }

    diagonals.sort_by(|a, b| a.total_cmp(b));
    let median = diagonals[diagonals.len() / 2];
    let tolerance = median * TOLERANCE_RATIO;

    debug!(median, tolerance, "derived adaptive tolerance");
    tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn square(id: u32, size: f64) -> Province {
        Province::new(
            id,
            format!("p{}", id),
            vec![
                Point::new(0.0, 0.0),
                Point::new(size, 0.0),
                Point::new(size, size),
                Point::new(0.0, size),
            ],
        )
    }

    #[test]
    fn fallback_when_no_provinces() {
        assert_eq!(adaptive_tolerance(&[]), FALLBACK_TOLERANCE);
    }

    #[test]
    fn fallback_when_all_boundaries_degenerate() {
        let degenerate = Province::new(1, "dot", vec![Point::new(0.0, 0.0)]);
        assert_eq!(adaptive_tolerance(&[degenerate]), FALLBACK_TOLERANCE);
    }

    #[test]
    fn single_province_uses_its_own_diagonal() {
        let tolerance = adaptive_tolerance(&[square(1, 10.0)]);
        let expected = (200.0_f64).sqrt() * TOLERANCE_RATIO;
        assert!((tolerance - expected).abs() < 1e-12);
    }

    #[test]
    fn median_is_lower_middle_for_even_counts() {
        // Diagonals sort to [d(1), d(2), d(4), d(8)]; index 4 / 2 = 2 picks
        // the size-4 square, not an average of the middle two.
        let provinces = vec![square(1, 8.0), square(2, 1.0), square(3, 4.0), square(4, 2.0)];
        let tolerance = adaptive_tolerance(&provinces);
        let expected = (32.0_f64).sqrt() * TOLERANCE_RATIO;
        assert!((tolerance - expected).abs() < 1e-12);
    }

    #[test]
    fn outlier_does_not_skew_median() {
        let provinces = vec![square(1, 1.0), square(2, 1.0), square(3, 1000.0)];
        let tolerance = adaptive_tolerance(&provinces);
        let expected = std::f64::consts::SQRT_2 * TOLERANCE_RATIO;
        assert!((tolerance - expected).abs() < 1e-12);
    }

    #[test]
    fn invalid_boundaries_are_ignored() {
        let provinces = vec![
            square(1, 2.0),
            Province::new(2, "line", vec![Point::new(0.0, 0.0), Point::new(99.0, 0.0)]),
        ];
        let tolerance = adaptive_tolerance(&provinces);
        let expected = (8.0_f64).sqrt() * TOLERANCE_RATIO;
        assert!((tolerance - expected).abs() < 1e-12);
    }
}
