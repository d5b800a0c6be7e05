//! Object detections and their view-space centers.
//!
//! Detectors report bounding boxes in normalized image coordinates with
//! the origin at the bottom-left. The overlay works in view coordinates
//! with the origin at the top-left, so boxes are flipped vertically and
//! scaled by the view size before their centers become graph points.

use serde::{Deserialize, Serialize};

use crate::types::{Point, ViewSize};

/// Axis-aligned box in normalized `[0, 1]` coordinates, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned box in view coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.width.mul_add(0.5, self.x),
            self.height.mul_add(0.5, self.y),
        )
    }
}

impl NormalizedRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Flip into a top-left origin and scale to `view`.
    #[must_use]
    pub fn to_view(&self, view: ViewSize) -> ViewRect {
        let flipped_y = 1.0 - self.y - self.height;
        ViewRect {
            x: self.x * view.width,
            y: flipped_y * view.height,
            width: self.width * view.width,
            height: self.height * view.height,
        }
    }
}

/// A single recognized object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Top classification label, if the detector produced one.
    #[serde(default)]
    pub label: Option<String>,
    /// Confidence of the top label in `[0, 1]`.
    #[serde(default)]
    pub confidence: f32,
    pub bounding_box: NormalizedRect,
}

impl Detection {
    /// Center of the bounding box in view coordinates.
    #[must_use]
    pub fn center(&self, view: ViewSize) -> Point {
        self.bounding_box.to_view(view).center()
    }
}

/// Centers of all detections, in detection order.
#[must_use]
pub fn detection_centers(detections: &[Detection], view: ViewSize) -> Vec<Point> {
    detections.iter().map(|d| d.center(view)).collect()
}
