//! Recorded frames: the input of one pass in a replayable form.
//!
//! A frame carries either explicit view points or detections (plus the
//! view size needed to place them), and optionally the hit-test result
//! recorded for each point. Frames are how the CLI and the integration
//! tests feed the selector without a live tracking session.

use serde::{Deserialize, Serialize};

use crate::detection::{Detection, detection_centers};
use crate::spatial::LookupMapper;
use crate::types::{ConnectorError, Point, Point3D, ViewSize};

/// Input of a single pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    /// View the points live in. Required when `detections` is used.
    pub view: Option<ViewSize>,
    /// Explicit view points. Ignored when `detections` is non-empty.
    pub points: Vec<Point>,
    /// Detections whose centers become the points.
    pub detections: Vec<Detection>,
    /// Recorded world position per point, `None` where hit-testing failed.
    pub world: Option<Vec<Option<Point3D>>>,
}

impl Frame {
    /// The view points for this frame.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::MissingView`] if the frame has detections
    /// but no view size.
    pub fn points(&self) -> Result<Vec<Point>, ConnectorError> {
        if self.detections.is_empty() {
            return Ok(self.points.clone());
        }
        let view = self.view.ok_or(ConnectorError::MissingView)?;
        Ok(detection_centers(&self.detections, view))
    }

    /// A mapper replaying the recorded world positions, if any.
    ///
    /// Returns `Ok(None)` when the frame has no `world` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::FrameMismatch`] if the table length does
    /// not match the number of points, or any error from
    /// [`points`](Self::points).
    pub fn lookup_mapper(&self) -> Result<Option<LookupMapper>, ConnectorError> {
        let Some(world) = &self.world else {
            return Ok(None);
        };
        let points = self.points()?;
        if world.len() != points.len() {
            return Err(ConnectorError::FrameMismatch {
                points: points.len(),
                world: world.len(),
            });
        }
        Ok(Some(
            points
                .into_iter()
                .zip(world.iter().copied())
                .filter_map(|(point, world)| world.map(|w| (point, w)))
                .collect(),
        ))
    }
}
