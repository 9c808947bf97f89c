//! Axis-aligned bounding boxes.
//!
//! Used both as the persisted per-map `bounds` summary and as the cheap
//! reject filter in the segment relation test and the broad-phase grid.

use serde::{Deserialize, Serialize};

use super::point::Point;

/// An axis-aligned bounding box.
///
/// Field order matches the persisted map schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// A box around a single point.
    pub fn from_point(p: Point) -> Bounds {
        Bounds {
            min_x: p.x,
            max_x: p.x,
            min_y: p.y,
            max_y: p.y,
        }
    }

    /// The box covering a point sequence, or `None` for an empty sequence.
    pub fn from_points(points: &[Point]) -> Option<Bounds> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Bounds::from_point(*first);
        for p in rest {
            bounds.include(*p);
        }
        Some(bounds)
    }

    /// Grows the box to cover `p`.
    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grows the box to cover `other`.
    pub fn merge(&mut self, other: Bounds) {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Returns the box expanded by `margin` on every side.
    pub fn expanded(self, margin: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }

    /// Returns true if the two boxes overlap on both axes.
    /// Boxes that merely share an edge or corner count as overlapping.
    pub fn overlaps(self, other: Bounds) -> bool {
        !(self.max_x < other.min_x
            || other.max_x < self.min_x
            || self.max_y < other.min_y
            || other.max_y < self.min_y)
    }

    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Length of the box diagonal.
    pub fn diagonal(self) -> f64 {
        let w = self.width();
        let h = self.height();
        (w * w + h * h).sqrt()
    }

    /// Returns the box with all four sides rounded to 2 decimal places,
    /// matching the persisted map schema.
    pub fn rounded(self) -> Bounds {
        Bounds {
            min_x: round2(self.min_x),
            max_x: round2(self.max_x),
            min_y: round2(self.min_y),
            max_y: round2(self.max_y),
        }
    }
}

/// Rounds to 2 decimal places, the precision used throughout map files.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
