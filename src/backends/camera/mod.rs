// SPDX-License-Identifier: GPL-3.0-only

//! Frame sources
//!
//! A [`FrameSource`] hands out one RGBA frame per call. Which implementation
//! runs is decided once, from configuration, by [`open_frame_source`]; the
//! tick loop never knows whether it is talking to a webcam, the Kinect color
//! stream or a folder of images.

pub mod file_source;
pub mod format_converters;
pub mod kinect;
pub mod types;
pub mod v4l2_capture;
pub mod webcam;

pub use file_source::ImageFileSource;
pub use kinect::DepthCameraSource;
pub use types::*;
pub use v4l2_capture::list_devices;
pub use webcam::WebcamSource;

use crate::config::SourceConfig;
use crate::constants::capture::DEFAULT_WEBCAM_DEVICE;
use tracing::info;

/// Supplier of frames, polled once per tick
pub trait FrameSource {
    /// Human-readable description for logs
    fn name(&self) -> String;

    /// Next frame, or `None` when the source has nothing new this tick
    fn next_frame(&mut self) -> BackendResult<Option<CameraFrame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn next_frame(&mut self) -> BackendResult<Option<CameraFrame>> {
        (**self).next_frame()
    }
}

/// Build the source selected in configuration
pub fn open_frame_source(config: &SourceConfig) -> BackendResult<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = match config.kind {
        SourceKind::Webcam => {
            let device = config.device.as_deref().unwrap_or(DEFAULT_WEBCAM_DEVICE);
            Box::new(WebcamSource::open(device)?)
        }
        SourceKind::DepthCamera => Box::new(DepthCameraSource::open(config.device.as_deref())?),
        SourceKind::ImageFile => {
            let path = config.image.as_deref().ok_or_else(|| {
                BackendError::InitializationFailed("Image source needs an image path".to_string())
            })?;
            Box::new(ImageFileSource::open(path)?)
        }
    };

    info!(kind = %config.kind, source = %source.name(), "Frame source ready");
    Ok(source)
}
