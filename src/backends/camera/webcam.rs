// SPDX-License-Identifier: GPL-3.0-only

//! Webcam frame source over V4L2

use super::FrameSource;
use super::types::{BackendResult, CameraFrame};
use super::v4l2_capture::{CaptureFormat, V4l2Capture};
use crate::constants::capture::{WEBCAM_HEIGHT, WEBCAM_WIDTH};

/// Formats tried in order; raw YUYV first since it needs no decoding
const WEBCAM_FORMATS: &[CaptureFormat] = &[
    CaptureFormat::Yuyv,
    CaptureFormat::Mjpeg,
    CaptureFormat::Rgb24,
];

pub struct WebcamSource {
    capture: V4l2Capture,
}

impl WebcamSource {
    pub fn open(device_path: &str) -> BackendResult<Self> {
        let capture = V4l2Capture::open(device_path, WEBCAM_WIDTH, WEBCAM_HEIGHT, WEBCAM_FORMATS)?;
        Ok(Self { capture })
    }
}

impl FrameSource for WebcamSource {
    fn name(&self) -> String {
        format!("webcam {} ({:?})", self.capture.path(), self.capture.format())
    }

    fn next_frame(&mut self) -> BackendResult<Option<CameraFrame>> {
        self.capture.read_frame().map(Some)
    }
}
