// SPDX-License-Identifier: GPL-3.0-only

//! Calibration region updates from corner markers

use crate::constants::markers::{BOTTOM_RIGHT_ID, TOP_LEFT_ID};
use crate::errors::GeometryError;
use crate::frame_processor::types::{CalibrationUpdate, DetectedMarker};
use crate::geometry::{CalibrationRegion, Dimensions, map_point_to_display};
use tracing::debug;

/// Move region corners to the markers whose payload is "1" or "2"
///
/// Marker "1" sets the top-left corner and marker "2" the bottom-right, each
/// from the marker's reference point mapped into display space without a Y
/// flip. When a payload appears more than once the last one wins. Other
/// payloads and markers without points are ignored. No check is made that
/// the resulting rectangle is non-degenerate.
pub fn resolve_calibration_region(
    markers: &[DetectedMarker],
    frame: Dimensions,
    display: Dimensions,
    region: &mut CalibrationRegion,
) -> Result<CalibrationUpdate, GeometryError> {
    let mut update = CalibrationUpdate::default();

    for marker in markers {
        let is_top_left = marker.id == TOP_LEFT_ID;
        if !is_top_left && marker.id != BOTTOM_RIGHT_ID {
            continue;
        }
        let Some(point) = marker.reference_point() else {
            debug!(id = %marker.id, "Calibration marker without points");
            continue;
        };

        let mapped = map_point_to_display(point, frame, display, false)?;
        if is_top_left {
            region.top_left = mapped;
            update.top_left = true;
        } else {
            region.bottom_right = mapped;
            update.bottom_right = true;
        }
        debug!(id = %marker.id, x = mapped.x, y = mapped.y, "Calibration corner moved");
    }

    update.region = *region;
    Ok(update)
}
