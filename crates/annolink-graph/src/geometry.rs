//! Planar geometry helpers: 2D distance and axis deviation.

use crate::types::Point;

/// Reference axis for [`angular_deviation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Euclidean distance between two view-space points.
#[must_use]
pub fn distance_2d(p1: Point, p2: Point) -> f64 {
    p1.distance(p2)
}

/// Angle in degrees, in `[0, 90]`, between segment `p1`-`p2` and `axis`.
///
/// A zero-length segment has no orientation and is reported as `0.0`,
/// so coincident points always pass an angle filter instead of producing
/// `NaN`.
#[must_use]
pub fn angular_deviation(p1: Point, p2: Point, axis: Axis) -> f64 {
    let dx = (p2.x - p1.x).abs();
    let dy = (p2.y - p1.y).abs();
    let (along, across) = match axis {
        Axis::Horizontal => (dx, dy),
        Axis::Vertical => (dy, dx),
    };

    let length = along.hypot(across);
    if length <= 0.0 {
        return 0.0;
    }

    // Rounding can push the ratio a hair above 1.0 for axis-aligned input.
    (along / length).clamp(0.0, 1.0).acos().to_degrees()
}

/// Deviation of one segment from both reference axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDeviation {
    pub horizontal: f64,
    pub vertical: f64,
}

impl AxisDeviation {
    /// Measure segment `p1`-`p2` against both axes.
    #[must_use]
    pub fn between(p1: Point, p2: Point) -> Self {
        Self {
            horizontal: angular_deviation(p1, p2, Axis::Horizontal),
            vertical: angular_deviation(p1, p2, Axis::Vertical),
        }
    }

    /// The smaller of the two deviations.
    #[must_use]
    pub fn min(self) -> f64 {
        self.horizontal.min(self.vertical)
    }

    /// Whether the segment is within `threshold` degrees of *either* axis.
    #[must_use]
    pub fn within(self, threshold: f64) -> bool {
        self.horizontal <= threshold || self.vertical <= threshold
    }
}
