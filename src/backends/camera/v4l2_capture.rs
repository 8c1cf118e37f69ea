// SPDX-License-Identifier: GPL-3.0-only

//! Blocking V4L2 capture shared by the webcam and depth-camera sources
//!
//! The stream is memory mapped and read one buffer per call, on the caller's
//! thread. Whatever format the driver agreed to is converted to RGBA before
//! the frame is returned.

use super::format_converters::{grbg_to_rgba, rgb24_to_rgba, uyvy_to_rgba, yuyv_to_rgba};
use super::types::{BackendError, BackendResult, CameraFrame, DeviceInfo};
use crate::constants::capture::STREAM_BUFFERS;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Capture formats this crate knows how to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Yuyv,
    Uyvy,
    BayerGrbg,
    Mjpeg,
    Rgb24,
}

impl CaptureFormat {
    pub fn fourcc(&self) -> FourCC {
        match self {
            CaptureFormat::Yuyv => FourCC::new(b"YUYV"),
            CaptureFormat::Uyvy => FourCC::new(b"UYVY"),
            CaptureFormat::BayerGrbg => FourCC::new(b"GRBG"),
            CaptureFormat::Mjpeg => FourCC::new(b"MJPG"),
            CaptureFormat::Rgb24 => FourCC::new(b"RGB3"),
        }
    }

    /// Convert one driver buffer into packed RGBA
    ///
    /// Returns the decoded dimensions, which only differ from the negotiated
    /// ones for MJPEG.
    pub fn to_rgba(
        &self,
        buf: &[u8],
        width: u32,
        height: u32,
    ) -> BackendResult<(u32, u32, Vec<u8>)> {
        let pixels = width as usize * height as usize;
        let needed = match self {
            CaptureFormat::Yuyv | CaptureFormat::Uyvy => pixels * 2,
            CaptureFormat::BayerGrbg => pixels,
            CaptureFormat::Rgb24 => pixels * 3,
            CaptureFormat::Mjpeg => 0,
        };
        if buf.len() < needed {
            return Err(BackendError::CaptureFailed(format!(
                "Short buffer: {} bytes for {}x{} {:?}",
                buf.len(),
                width,
                height,
                self
            )));
        }

        let rgba = match self {
            CaptureFormat::Yuyv => yuyv_to_rgba(buf, width, height),
            CaptureFormat::Uyvy => uyvy_to_rgba(buf, width, height),
            CaptureFormat::BayerGrbg => grbg_to_rgba(buf, width, height),
            CaptureFormat::Rgb24 => rgb24_to_rgba(buf, width, height),
            CaptureFormat::Mjpeg => {
                let img = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)?;
                let img = img.to_rgba8();
                return Ok((img.width(), img.height(), img.into_raw()));
            }
        };
        Ok((width, height, rgba))
    }
}

/// An open, streaming V4L2 capture device
pub struct V4l2Capture {
    // Declared before the device so buffers are unmapped first
    stream: Stream<'static>,
    _device: Device,
    path: String,
    format: CaptureFormat,
    width: u32,
    height: u32,
    frames: u64,
}

impl V4l2Capture {
    /// Open `path` and negotiate the first format in `preferred` the driver accepts
    pub fn open(
        path: &str,
        width: u32,
        height: u32,
        preferred: &[CaptureFormat],
    ) -> BackendResult<Self> {
        let device = Device::with_path(path)
            .map_err(|e| BackendError::DeviceNotFound(format!("{}: {}", path, e)))?;

        let mut negotiated = None;
        for candidate in preferred {
            let request = Format::new(width, height, candidate.fourcc());
            match device.set_format(&request) {
                Ok(actual) if actual.fourcc == candidate.fourcc() => {
                    negotiated = Some((*candidate, actual));
                    break;
                }
                Ok(actual) => {
                    debug!(
                        path,
                        requested = ?candidate,
                        got = ?actual.fourcc,
                        "Driver substituted format"
                    );
                }
                Err(e) => {
                    debug!(path, requested = ?candidate, error = %e, "Format rejected");
                }
            }
        }

        let (format, actual) = negotiated.ok_or_else(|| {
            BackendError::FormatNotSupported(format!("{} accepts none of {:?}", path, preferred))
        })?;

        let stream = Stream::with_buffers(&device, Type::VideoCapture, STREAM_BUFFERS)
            .map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to create stream: {}", e))
            })?;

        info!(
            path,
            width = actual.width,
            height = actual.height,
            format = ?format,
            "V4L2 capture configured"
        );

        Ok(Self {
            stream,
            _device: device,
            path: path.to_string(),
            format,
            width: actual.width,
            height: actual.height,
            frames: 0,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn format(&self) -> CaptureFormat {
        self.format
    }

    /// Dequeue the next buffer and convert it to an RGBA frame
    pub fn read_frame(&mut self) -> BackendResult<CameraFrame> {
        let (buf, meta) = self
            .stream
            .next()
            .map_err(|e| BackendError::CaptureFailed(e.to_string()))?;

        let used = (meta.bytesused as usize).min(buf.len());
        let used = if used == 0 { buf.len() } else { used };
        let sequence = meta.sequence as u64;

        let (width, height, rgba) = self.format.to_rgba(&buf[..used], self.width, self.height)?;

        self.frames += 1;
        if self.frames == 1 {
            debug!(path = %self.path, width, height, "First frame captured");
        }

        Ok(CameraFrame::from_rgba(width, height, rgba, sequence))
    }
}

/// Enumerate V4L2 capture nodes
pub fn list_devices() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = v4l::context::enum_devices()
        .into_iter()
        .map(|node| {
            let path = node.path().to_string_lossy().to_string();
            let driver = Device::with_path(node.path())
                .and_then(|dev| dev.query_caps())
                .map(|caps| caps.driver)
                .unwrap_or_default();
            DeviceInfo {
                index: node.index(),
                name: node.name().unwrap_or_default(),
                driver,
                path,
            }
        })
        .collect();
    devices.sort_by_key(|d| d.index);
    devices
}

/// Find the Kinect color node exposed by the kernel `kinect` driver
///
/// The driver registers a depth node (Y10B/Y16) and a color node
/// (UYVY/GRBG) under the same driver name; only the color node is useful here.
pub fn find_kinect_color_device() -> Option<String> {
    let color = [CaptureFormat::Uyvy.fourcc(), CaptureFormat::BayerGrbg.fourcc()];

    list_devices()
        .into_iter()
        .filter(|d| d.driver == "kinect")
        .find(|d| {
            let Ok(dev) = Device::with_path(&d.path) else {
                warn!(path = %d.path, "Kinect node vanished during scan");
                return false;
            };
            dev.enum_formats()
                .unwrap_or_default()
                .iter()
                .any(|desc| color.contains(&desc.fourcc))
        })
        .map(|d| d.path)
}
