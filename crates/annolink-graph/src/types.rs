//! Shared types for the annolink connection builder.

use serde::{Deserialize, Serialize};

use crate::select::ConnectionStrategy;

/// A 2D point in view coordinates.
///
/// Typically the center of a detected object's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (points from left edge).
    pub x: f64,
    /// Vertical position (points from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new(f64::midpoint(self.x, other.x), f64::midpoint(self.y, other.y))
    }
}

/// A point in the spatial tracking frame, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    /// Create a new 3D point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Magnitude of the difference vector `other - self`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dz.mul_add(dz, dx.mul_add(dx, dy * dy)).sqrt()
    }
}

/// Size of the view that detection centers are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSize {
    pub width: f64,
    pub height: f64,
}

/// A candidate connection between two input points.
///
/// Undirected. `a_index < b_index` always holds for edges produced by
/// [`build_edges`](crate::edges::build_edges).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Position of `a` in the input point list.
    pub a_index: usize,
    /// Position of `b` in the input point list.
    pub b_index: usize,
    pub a: Point,
    pub b: Point,
    /// On-screen (2D) length of the edge.
    pub length: f64,
}

/// A connection admitted for rendering, with its annotation values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptedConnection {
    /// Position of `a` in the input point list.
    pub a_index: usize,
    /// Position of `b` in the input point list.
    pub b_index: usize,
    pub a: Point,
    pub b: Point,
    /// Real-world distance between the projected endpoints, in millimetres.
    pub distance_mm: f64,
    /// Smaller of the two axis deviations, in degrees.
    pub angle_degrees: f64,
}

impl AcceptedConnection {
    /// Anchor point for the annotation label.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.a.midpoint(self.b)
    }

    /// Annotation text: `"{distance_mm}, {angle_degrees}°"`.
    ///
    /// Both values are truncated toward zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn label(&self) -> String {
        let distance = self.distance_mm.trunc() as i64;
        let angle = self.angle_degrees.trunc() as i64;
        format!("{distance}, {angle}°")
    }
}

/// Inclusive range of admissible real-world distances, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRange {
    pub min: f64,
    pub max: f64,
}

impl DistanceRange {
    /// Create a new range. No validation; see [`ConnectorConfig::validate`].
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `distance` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.min && distance <= self.max
    }
}

impl Default for DistanceRange {
    fn default() -> Self {
        Self::new(
            ConnectorConfig::DEFAULT_DISTANCE_MIN,
            ConnectorConfig::DEFAULT_DISTANCE_MAX,
        )
    }
}

/// How input points map to graph nodes within a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeIdentity {
    /// Points with bit-identical coordinates are the same node and share
    /// one degree counter.
    #[default]
    ByValue,
    /// Every input point is its own node, even if it coincides with
    /// another.
    ByIndex,
}

/// Configuration for one connection-selection pass.
///
/// Values are validated at the UI boundary via [`validate`](Self::validate)
/// or [`from_fields`](Self::from_fields). Selection itself assumes a valid
/// configuration and never re-checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Maximum number of accepted connections per node.
    pub max_degree: usize,

    /// An edge passes the angle filter when its deviation from either the
    /// horizontal or the vertical axis is at most this many degrees.
    pub angle_range_degrees: f64,

    /// Admissible real-world distance between connected points.
    pub real_distance_range: DistanceRange,

    /// Which selection strategy to run.
    pub strategy: ConnectionStrategy,

    /// How coincident points are keyed.
    pub identity: NodeIdentity,
}

impl ConnectorConfig {
    pub const DEFAULT_MAX_DEGREE: usize = 4;
    pub const DEFAULT_ANGLE_RANGE_DEGREES: f64 = 5.0;
    pub const DEFAULT_DISTANCE_MIN: f64 = 50.0;
    pub const DEFAULT_DISTANCE_MAX: f64 = 150.0;

    /// Build a configuration from raw text fields (angle, distance from,
    /// distance to), keeping every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::InvalidNumber`] if a field does not parse
    /// as a number, or any error from [`validate`](Self::validate).
    pub fn from_fields(angle: &str, from: &str, to: &str) -> Result<Self, ConnectorError> {
        Self::default().with_fields(angle, from, to)
    }

    /// Replace the user-adjustable fields from raw text, keeping the rest
    /// of `self`.
    ///
    /// # Errors
    ///
    /// See [`from_fields`](Self::from_fields).
    pub fn with_fields(self, angle: &str, from: &str, to: &str) -> Result<Self, ConnectorError> {
        let config = Self {
            angle_range_degrees: parse_field("angle", angle)?,
            real_distance_range: DistanceRange::new(
                parse_field("distance from", from)?,
                parse_field("distance to", to)?,
            ),
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`ConnectorError::ZeroDegreeCap`] if `max_degree == 0`.
    /// - [`ConnectorError::InvalidAngle`] unless the angle is finite and
    ///   within `[0, 90]`.
    /// - [`ConnectorError::InvalidDistance`] if a bound is negative or
    ///   not finite.
    /// - [`ConnectorError::EmptyDistanceRange`] if `max <= min`.
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.max_degree == 0 {
            return Err(ConnectorError::ZeroDegreeCap);
        }
        let angle = self.angle_range_degrees;
        if !angle.is_finite() || !(0.0..=90.0).contains(&angle) {
            return Err(ConnectorError::InvalidAngle(angle));
        }
        let DistanceRange { min, max } = self.real_distance_range;
        for bound in [min, max] {
            if !bound.is_finite() || bound < 0.0 {
                return Err(ConnectorError::InvalidDistance(bound));
            }
        }
        if max <= min {
            return Err(ConnectorError::EmptyDistanceRange { min, max });
        }
        Ok(())
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            max_degree: Self::DEFAULT_MAX_DEGREE,
            angle_range_degrees: Self::DEFAULT_ANGLE_RANGE_DEGREES,
            real_distance_range: DistanceRange::default(),
            strategy: ConnectionStrategy::default(),
            identity: NodeIdentity::default(),
        }
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, ConnectorError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConnectorError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}

/// Errors raised at the configuration and frame-loading boundary.
///
/// Connection selection itself is infallible.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectorError {
    /// A text field could not be parsed as a number.
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The degree cap is zero, so nothing could ever be connected.
    #[error("maximum degree must be at least 1")]
    ZeroDegreeCap,

    /// The angle threshold is outside `[0, 90]` degrees.
    #[error("angle range must be between 0 and 90 degrees, got {0}")]
    InvalidAngle(f64),

    /// A distance bound is negative or not finite.
    #[error("distance bound must be a non-negative finite number, got {0}")]
    InvalidDistance(f64),

    /// The distance range is empty (`max <= min`).
    #[error("distance range is empty: to ({max}) must be greater than from ({min})")]
    EmptyDistanceRange { min: f64, max: f64 },

    /// A frame's projection table does not line up with its points.
    #[error("frame has {points} points but {world} projection entries")]
    FrameMismatch { points: usize, world: usize },

    /// A frame has detections but no view size to place them in.
    #[error("frame has detections but no view size")]
    MissingView,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_midpoint() {
        let m = Point::new(0.0, 10.0).midpoint(Point::new(10.0, 0.0));
        assert_eq!(m, Point::new(5.0, 5.0));
    }

    #[test]
    fn point3d_distance_uses_all_axes() {
        let a = Point3D::new(0.0, 0.0, 0.0);
        let b = Point3D::new(0.0, 0.0, 0.2);
        assert!((a.distance(b) - 0.2).abs() < 1e-12);
        let c = Point3D::new(1.0, 2.0, 2.0);
        assert!((a.distance(c) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn label_truncates_both_values() {
        let connection = AcceptedConnection {
            a_index: 0,
            b_index: 1,
            a: Point::new(0.0, 0.0),
            b: Point::new(10.0, 0.0),
            distance_mm: 99.9,
            angle_degrees: 4.7,
        };
        assert_eq!(connection.label(), "99, 4°");
        assert_eq!(connection.midpoint(), Point::new(5.0, 0.0));
    }

    #[test]
    fn distance_range_is_inclusive() {
        let range = DistanceRange::new(50.0, 150.0);
        assert!(range.contains(50.0));
        assert!(range.contains(150.0));
        assert!(!range.contains(49.999));
        assert!(!range.contains(150.001));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn config_defaults() {
        let config = ConnectorConfig::default();
        assert_eq!(config.max_degree, 4);
        assert!((config.angle_range_degrees - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.real_distance_range, DistanceRange::new(50.0, 150.0));
        assert_eq!(config.strategy, ConnectionStrategy::DegreeCapped);
        assert_eq!(config.identity, NodeIdentity::ByValue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_fields_parses_trimmed_numbers() {
        let config = ConnectorConfig::from_fields(" 10 ", "20", "300.5").unwrap();
        assert!((config.angle_range_degrees - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.real_distance_range, DistanceRange::new(20.0, 300.5));
        assert_eq!(config.max_degree, ConnectorConfig::DEFAULT_MAX_DEGREE);
    }

    #[test]
    fn from_fields_rejects_non_numeric() {
        let err = ConnectorConfig::from_fields("five", "50", "150").unwrap_err();
        assert_eq!(
            err,
            ConnectorError::InvalidNumber {
                field: "angle",
                value: "five".to_owned(),
            }
        );
    }

    #[test]
    fn from_fields_rejects_inverted_range() {
        let err = ConnectorConfig::from_fields("5", "150", "150").unwrap_err();
        assert!(matches!(err, ConnectorError::EmptyDistanceRange { .. }));
        let err = ConnectorConfig::from_fields("5", "150", "50").unwrap_err();
        assert!(matches!(err, ConnectorError::EmptyDistanceRange { .. }));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_cap = ConnectorConfig {
            max_degree: 0,
            ..ConnectorConfig::default()
        };
        assert_eq!(zero_cap.validate(), Err(ConnectorError::ZeroDegreeCap));

        let wide_angle = ConnectorConfig {
            angle_range_degrees: 91.0,
            ..ConnectorConfig::default()
        };
        assert!(matches!(
            wide_angle.validate(),
            Err(ConnectorError::InvalidAngle(_))
        ));

        let negative = ConnectorConfig {
            real_distance_range: DistanceRange::new(-1.0, 10.0),
            ..ConnectorConfig::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConnectorError::InvalidDistance(_))
        ));

        let infinite = ConnectorConfig {
            real_distance_range: DistanceRange::new(0.0, f64::INFINITY),
            ..ConnectorConfig::default()
        };
        assert!(matches!(
            infinite.validate(),
            Err(ConnectorError::InvalidDistance(_))
        ));
    }

    #[test]
    fn error_display() {
        let err = ConnectorError::EmptyDistanceRange {
            min: 150.0,
            max: 50.0,
        };
        assert_eq!(
            err.to_string(),
            "distance range is empty: to (50) must be greater than from (150)"
        );
    }

    #[test]
    fn config_serde_round_trip() {
        let config = ConnectorConfig {
            max_degree: 2,
            angle_range_degrees: 12.5,
            real_distance_range: DistanceRange::new(10.0, 20.0),
            strategy: ConnectionStrategy::SpanningTree,
            identity: NodeIdentity::ByIndex,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ConnectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn config_missing_fields_use_defaults() {
        let config: ConnectorConfig = serde_json::from_str(r#"{"angle_range_degrees": 8.0}"#).unwrap();
        assert!((config.angle_range_degrees - 8.0).abs() < f64::EPSILON);
        assert_eq!(config.max_degree, ConnectorConfig::DEFAULT_MAX_DEGREE);
    }
}
