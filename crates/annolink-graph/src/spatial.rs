//! Spatial capabilities injected into connection selection.
//!
//! Projection from view space into the tracking frame is owned by an
//! external subsystem (feature-point hit-testing). The selector only sees
//! it through [`SpatialMapper`], which makes it easy to stub in tests and
//! to replay recorded frames.

use std::collections::HashMap;

use crate::nodes::CoordKey;
use crate::types::{Point, Point3D};

/// Scale from tracking-frame units (metres) to reported units.
pub const METRES_TO_MILLIMETRES: f64 = 1000.0;

/// Projects view points into 3D and measures real-world distance.
pub trait SpatialMapper {
    /// World position under `point`, or `None` if no surface was found.
    fn project(&self, point: Point) -> Option<Point3D>;

    /// Real-world distance between two projected points, in millimetres.
    fn real_distance(&self, a: Point3D, b: Point3D) -> f64 {
        a.distance(b) * METRES_TO_MILLIMETRES
    }
}

impl<F> SpatialMapper for F
where
    F: Fn(Point) -> Option<Point3D>,
{
    fn project(&self, point: Point) -> Option<Point3D> {
        self(point)
    }
}

/// Replays recorded hit-test results keyed by exact view position.
#[derive(Debug, Clone, Default)]
pub struct LookupMapper {
    table: HashMap<CoordKey, Point3D>,
}

impl LookupMapper {
    /// Create an empty mapper; every projection fails until populated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the world position for `point`, replacing any earlier one.
    pub fn insert(&mut self, point: Point, world: Point3D) {
        self.table.insert(CoordKey::from_point(point), world);
    }

    /// Number of recorded positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<(Point, Point3D)> for LookupMapper {
    fn from_iter<I: IntoIterator<Item = (Point, Point3D)>>(iter: I) -> Self {
        let mut mapper = Self::new();
        for (point, world) in iter {
            mapper.insert(point, world);
        }
        mapper
    }
}

impl SpatialMapper for LookupMapper {
    fn project(&self, point: Point) -> Option<Point3D> {
        self.table.get(&CoordKey::from_point(point)).copied()
    }
}

/// Treats the view as a flat surface facing the camera at a fixed scale.
///
/// Useful for synthetic frames where no hit-test data was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarMapper {
    /// Metres covered by one view point.
    pub metres_per_point: f64,
}

impl PlanarMapper {
    #[must_use]
    pub const fn new(metres_per_point: f64) -> Self {
        Self { metres_per_point }
    }
}

impl SpatialMapper for PlanarMapper {
    fn project(&self, point: Point) -> Option<Point3D> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return None;
        }
        Some(Point3D::new(
            point.x * self.metres_per_point,
            point.y * self.metres_per_point,
            0.0,
        ))
    }
}
