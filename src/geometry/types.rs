// SPDX-License-Identifier: GPL-3.0-only

//! Value types shared by the geometry functions
//!
//! All points are `glam::DVec2` in either source pixel space (origin top-left,
//! Y down) or display space. Which space a point lives in is carried by the
//! field name, not the type.

use crate::constants::region;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Width and height of a pixel buffer or display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size as a float vector, handy for scaling
    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangle in display space used to crop frames before detection
///
/// The two corners are stored exactly as calibration produced them. Nothing
/// guarantees that `top_left` is actually above and left of `bottom_right`;
/// consumers that need a proper rectangle use [`CalibrationRegion::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRegion {
    pub top_left: DVec2,
    pub bottom_right: DVec2,
}

impl CalibrationRegion {
    pub fn new(top_left: DVec2, bottom_right: DVec2) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Region shown by the calibration run before any marker is seen
    pub fn calibration_default() -> Self {
        Self::new(
            DVec2::from(region::CALIBRATION_TOP_LEFT),
            DVec2::from(region::CALIBRATION_BOTTOM_RIGHT),
        )
    }

    /// Crop used by tracking when no calibration has been saved
    pub fn tracking_default() -> Self {
        Self::new(
            DVec2::from(region::TRACKING_TOP_LEFT),
            DVec2::from(region::TRACKING_BOTTOM_RIGHT),
        )
    }

    /// Copy with corners swapped per axis so that min is top-left
    pub fn normalized(&self) -> Self {
        Self::new(
            self.top_left.min(self.bottom_right),
            self.top_left.max(self.bottom_right),
        )
    }
}

impl Default for CalibrationRegion {
    fn default() -> Self {
        Self::tracking_default()
    }
}

/// Position and rotation derived for one marker in one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Index into the target list (0-based)
    pub target_index: usize,
    /// Target name from the configuration
    pub target: String,
    /// Marker reference corner in display space (Y up)
    pub display: DVec2,
    /// Projected world point, always on the z = 0 plane
    pub world: DVec3,
    /// Rotation in degrees; `None` when the corners were degenerate
    pub angle: Option<f64>,
}
