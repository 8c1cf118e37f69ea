// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing
//!
//! Turns frames into markers and markers into either a calibration region or
//! target placements, one tick at a time.

pub mod crop;
pub mod session;
pub mod tasks;
pub mod types;

pub use crop::{PixelRect, crop_frame};
pub use session::{CalibrationSession, TrackingSession};
pub use tasks::{MarkerDetector, QrDetector, TargetRegistry, TrackedTarget};
pub use types::{
    Assignment, CalibrationUpdate, DetectedMarker, SkipReason, SkippedMarker, TickError,
    TickOutcome,
};
