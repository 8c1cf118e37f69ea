// SPDX-License-Identifier: GPL-3.0-only

//! Marker geometry
//!
//! Engine-independent math that turns detected marker corners into
//! placements: a planar rotation angle from two opposing corners, and the
//! conversion chain from sensor pixels to display space to world space.

pub mod projector;
pub mod types;

pub use projector::{DisplayProjector, OrthographicProjector, ViewportProjector};
pub use types::{CalibrationRegion, Dimensions, Placement};

use crate::constants::markers::MIN_FEATURE_POINTS;
use crate::errors::GeometryError;
use glam::{DVec2, DVec3};

/// Planar rotation of a marker in degrees, in `[0, 360)`
///
/// Point 0 is the reference corner and does not take part in the math;
/// points 1 and 2 are the opposing pair `a` and `b`. The arctangent of
/// their Y/X separation gives an angle inside one quadrant, and the ordering
/// of `a` against `b` on each axis picks the quadrant. Ties on either axis
/// fall into the `else` branches.
///
/// When `a.y > b.y` and `a.x <= b.x` the base angle is returned unadjusted,
/// unlike the other three branches. Tests pin this behavior; changing it
/// moves every marker in that sector.
///
/// Vertically aligned corners (`a.x == b.x`) have no meaningful arctangent
/// and yield [`GeometryError::DegenerateCorners`].
pub fn compute_angle(points: &[DVec2]) -> Result<f64, GeometryError> {
    if points.len() < MIN_FEATURE_POINTS {
        return Err(GeometryError::InsufficientPoints {
            found: points.len(),
        });
    }

    let a = points[1];
    let b = points[2];
    if !a.is_finite() || !b.is_finite() {
        return Err(GeometryError::DegenerateCorners);
    }

    let dz = (a.x - b.x).abs();
    let dx = (a.y - b.y).abs();
    if dz == 0.0 {
        return Err(GeometryError::DegenerateCorners);
    }
    let base = (dx / dz).atan().to_degrees();

    let theta = if a.y > b.y {
        if a.x > b.x { 90.0 + (90.0 - base) } else { base }
    } else if a.x > b.x {
        180.0 + base
    } else {
        360.0 - base
    };

    // Only `360 - 0` can land on 360
    Ok(theta.rem_euclid(360.0))
}

/// Scale a source pixel into display space
///
/// With `flip_y` the result has its origin at the bottom of the display,
/// which is what world projection expects. Without it the display keeps the
/// image convention (Y down).
pub fn map_point_to_display(
    point: DVec2,
    source: Dimensions,
    display: Dimensions,
    flip_y: bool,
) -> Result<DVec2, GeometryError> {
    if source.is_empty() {
        return Err(GeometryError::EmptySource);
    }

    let x = point.x / source.width as f64 * display.width as f64;
    let y = point.y / source.height as f64 * display.height as f64;
    let y = if flip_y { display.height as f64 - y } else { y };
    Ok(DVec2::new(x, y))
}

/// Project a display point into the world and pin it to the z = 0 plane
pub fn map_display_to_world(point: DVec2, projector: &dyn ViewportProjector) -> DVec3 {
    let mut world = projector.display_to_world(point);
    world.z = 0.0;
    world
}
