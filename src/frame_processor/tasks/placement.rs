// SPDX-License-Identifier: GPL-3.0-only

//! Marker-to-target assignment and the registry placements are applied to

use crate::constants::markers::MIN_FEATURE_POINTS;
use crate::errors::GeometryError;
use crate::frame_processor::types::{Assignment, DetectedMarker, SkipReason, SkippedMarker};
use crate::geometry::{
    Dimensions, Placement, ViewportProjector, compute_angle, map_display_to_world,
    map_point_to_display,
};
use glam::DVec3;
use serde::Serialize;
use tracing::debug;

/// Everything needed to place markers found in one (cropped) frame
pub struct PlacementContext<'a> {
    /// Size of the frame the marker points are relative to
    pub frame: Dimensions,
    /// Display the frame is stretched over
    pub display: Dimensions,
    /// Display-to-world projection
    pub projector: &'a dyn ViewportProjector,
}

/// Resolve a payload into a 0-based target index
fn target_index(id: &str, target_count: usize) -> Result<usize, SkipReason> {
    let number: i64 = id.trim().parse().map_err(|_| SkipReason::InvalidId)?;
    if number < 1 || number as u64 > target_count as u64 {
        return Err(SkipReason::OutOfRange);
    }
    Ok(number as usize - 1)
}

/// Compute a placement for every marker that names a valid target
///
/// Payloads are 1-based indices into `targets`. A marker with a bad payload
/// or too few points is recorded in [`Assignment::skipped`] and the rest of
/// the batch carries on. Positions are mapped with a Y flip so that display
/// space grows upward, then projected onto the z = 0 plane. Corners that do
/// not define an angle give `angle: None`.
///
/// `Err` is only returned for failures that affect the whole batch, such as
/// a zero-sized frame.
pub fn assign_markers_to_targets<S: AsRef<str>>(
    markers: &[DetectedMarker],
    targets: &[S],
    context: &PlacementContext<'_>,
) -> Result<Assignment, GeometryError> {
    let mut assignment = Assignment::default();

    for marker in markers {
        let skip = |reason: SkipReason| {
            debug!(id = %marker.id, %reason, "Skipping marker");
            SkippedMarker {
                id: marker.id.clone(),
                reason,
            }
        };

        let index = match target_index(&marker.id, targets.len()) {
            Ok(index) => index,
            Err(reason) => {
                assignment.skipped.push(skip(reason));
                continue;
            }
        };
        if marker.points.len() < MIN_FEATURE_POINTS {
            assignment.skipped.push(skip(SkipReason::MissingPoints));
            continue;
        }

        let display = map_point_to_display(marker.points[0], context.frame, context.display, true)?;
        let world = map_display_to_world(display, context.projector);
        let angle = match compute_angle(&marker.points) {
            Ok(angle) => Some(angle),
            Err(GeometryError::DegenerateCorners) => {
                debug!(id = %marker.id, "Degenerate corners, keeping previous rotation");
                None
            }
            Err(e) => return Err(e),
        };

        assignment.placements.push(Placement {
            target_index: index,
            target: targets[index].as_ref().to_string(),
            display,
            world,
            angle,
        });
    }

    Ok(assignment)
}

/// A target and the last placement applied to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedTarget {
    pub name: String,
    pub position: Option<DVec3>,
    /// Rotation about Z in degrees
    pub rotation: Option<f64>,
}

/// Ordered list of targets that marker payloads index into
///
/// Placements persist here between ticks; a tick that fails or sees nothing
/// leaves every target where the last successful tick put it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TargetRegistry {
    targets: Vec<TrackedTarget>,
}

impl TargetRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: names
                .into_iter()
                .map(|name| TrackedTarget {
                    name: name.into(),
                    position: None,
                    rotation: None,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, index: usize) -> Option<&TrackedTarget> {
        self.targets.get(index)
    }

    pub fn targets(&self) -> &[TrackedTarget] {
        &self.targets
    }

    /// Move targets to their new placements
    ///
    /// Position always follows the placement; rotation only changes when the
    /// placement carries an angle.
    pub fn apply(&mut self, placements: &[Placement]) {
        for placement in placements {
            let Some(target) = self.targets.get_mut(placement.target_index) else {
                continue;
            };
            target.position = Some(placement.world);
            if let Some(angle) = placement.angle {
                target.rotation = Some(angle);
            }
        }
    }
}
