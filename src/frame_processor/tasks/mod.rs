// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing tasks
//!
//! This module contains the detector abstraction and the per-batch tasks
//! that turn detected markers into a calibration region or placements.

pub mod calibration;
pub mod placement;
pub mod qr_detector;

pub use calibration::resolve_calibration_region;
pub use placement::{PlacementContext, TargetRegistry, TrackedTarget, assign_markers_to_targets};
pub use qr_detector::QrDetector;

use super::types::DetectedMarker;
use crate::backends::camera::CameraFrame;
use crate::errors::DetectionError;

/// Finds markers in a single frame
///
/// Missing a marker is normal (blur, lighting, occlusion) and is not an
/// error; `Err` is reserved for the detector itself failing.
pub trait MarkerDetector {
    fn detect(&self, frame: &CameraFrame) -> Result<Vec<DetectedMarker>, DetectionError>;
}

impl<D: MarkerDetector + ?Sized> MarkerDetector for Box<D> {
    fn detect(&self, frame: &CameraFrame) -> Result<Vec<DetectedMarker>, DetectionError> {
        (**self).detect(frame)
    }
}
