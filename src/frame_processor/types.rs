// SPDX-License-Identifier: GPL-3.0-only

//! Core types for frame processing results
//!
//! These types carry one tick's worth of data from the detector through the
//! geometry code to whoever consumes placements. None of them outlive the
//! tick except through the session state that applies them.

use crate::backends::camera::BackendError;
use crate::errors::{DetectionError, GeometryError};
use crate::geometry::{CalibrationRegion, Placement};
use glam::DVec2;
use serde::Serialize;
use std::fmt;

/// A QR code found in one frame
///
/// Points are in the pixel space of the frame the detector saw (origin
/// top-left, Y down), ordered bottom-left, top-left, top-right, then any
/// further points the detector reports. For QR codes these are the finder
/// pattern centres, not the outer corners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedMarker {
    /// Decoded payload
    pub id: String,
    /// Feature points
    pub points: Vec<DVec2>,
}

impl DetectedMarker {
    pub fn new(id: impl Into<String>, points: Vec<DVec2>) -> Self {
        Self {
            id: id.into(),
            points,
        }
    }

    /// Reference corner used for positioning
    pub fn reference_point(&self) -> Option<DVec2> {
        self.points.first().copied()
    }
}

/// Why a marker was left out of a tracking batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Payload is not an integer
    InvalidId,
    /// Payload is an integer but not a valid 1-based target index
    OutOfRange,
    /// Not enough feature points to place the marker
    MissingPoints,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidId => write!(f, "payload is not a target number"),
            SkipReason::OutOfRange => write!(f, "target number out of range"),
            SkipReason::MissingPoints => write!(f, "too few feature points"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMarker {
    pub id: String,
    pub reason: SkipReason,
}

/// Result of matching one batch of markers against the target list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assignment {
    pub placements: Vec<Placement>,
    pub skipped: Vec<SkippedMarker>,
}

/// Which region corners a calibration batch moved
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CalibrationUpdate {
    pub top_left: bool,
    pub bottom_right: bool,
    /// Region after the batch was applied
    pub region: CalibrationRegion,
}

impl CalibrationUpdate {
    pub fn changed(&self) -> bool {
        self.top_left || self.bottom_right
    }
}

/// Why a whole tick was abandoned
#[derive(Debug, Clone, PartialEq)]
pub enum TickError {
    /// The frame source failed
    Source(BackendError),
    /// Cropping or decoding failed
    Detection(DetectionError),
    /// Batch-level geometry failure (e.g. zero-sized frame)
    Geometry(GeometryError),
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::Source(e) => write!(f, "{}", e),
            TickError::Detection(e) => write!(f, "{}", e),
            TickError::Geometry(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TickError {}

impl From<BackendError> for TickError {
    fn from(err: BackendError) -> Self {
        TickError::Source(err)
    }
}

impl From<DetectionError> for TickError {
    fn from(err: DetectionError) -> Self {
        TickError::Detection(err)
    }
}

impl From<GeometryError> for TickError {
    fn from(err: GeometryError) -> Self {
        TickError::Geometry(err)
    }
}

/// What one tick produced
///
/// "Nothing was seen" and "something broke" are separate variants so callers
/// never have to infer one from an empty list.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome<T> {
    /// The source had no new frame
    NoFrame,
    /// The detector ran and found no markers
    NoMarkers,
    /// Markers were found and processed
    Processed(T),
    /// The tick was abandoned; state from earlier ticks is untouched
    Failed(TickError),
}

impl<T> TickOutcome<T> {
    pub fn processed(&self) -> Option<&T> {
        match self {
            TickOutcome::Processed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TickOutcome::Failed(_))
    }
}
