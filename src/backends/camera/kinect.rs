// SPDX-License-Identifier: GPL-3.0-only

//! Kinect color stream as a frame source
//!
//! The kernel `kinect` driver exposes the RGB camera of a Kinect as a plain
//! V4L2 node delivering UYVY (or raw Bayer GRBG) at 640x480. Depth data is
//! not used for marker tracking; only the color image is decoded.

use super::FrameSource;
use super::types::{BackendError, BackendResult, CameraFrame};
use super::v4l2_capture::{CaptureFormat, V4l2Capture, find_kinect_color_device};
use crate::constants::capture::{KINECT_COLOR_HEIGHT, KINECT_COLOR_WIDTH};
use tracing::info;

const KINECT_FORMATS: &[CaptureFormat] = &[CaptureFormat::Uyvy, CaptureFormat::BayerGrbg];

pub struct DepthCameraSource {
    capture: V4l2Capture,
}

impl DepthCameraSource {
    /// Open the given node, or look up the Kinect color node when `None`
    pub fn open(device_path: Option<&str>) -> BackendResult<Self> {
        let path = match device_path {
            Some(path) => path.to_string(),
            None => find_kinect_color_device().ok_or_else(|| {
                BackendError::NotAvailable("No Kinect color device found".to_string())
            })?,
        };

        info!(path = %path, "Opening Kinect color stream");
        let capture = V4l2Capture::open(
            &path,
            KINECT_COLOR_WIDTH,
            KINECT_COLOR_HEIGHT,
            KINECT_FORMATS,
        )?;
        Ok(Self { capture })
    }
}

impl FrameSource for DepthCameraSource {
    fn name(&self) -> String {
        format!("kinect {} ({:?})", self.capture.path(), self.capture.format())
    }

    fn next_frame(&mut self) -> BackendResult<Option<CameraFrame>> {
        self.capture.read_frame().map(Some)
    }
}
