// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for frame sources

use crate::geometry::Dimensions;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which kind of source feeds the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// USB/V4L2 webcam
    #[default]
    Webcam,
    /// Color stream of a Kinect depth camera (kernel driver)
    DepthCamera,
    /// Still image or a directory of images
    ImageFile,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Webcam => write!(f, "webcam"),
            SourceKind::DepthCamera => write!(f, "depth camera"),
            SourceKind::ImageFile => write!(f, "image file"),
        }
    }
}

/// V4L2 device node as reported by enumeration
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    /// Node index (`/dev/videoN`)
    pub index: usize,
    /// Card name reported by the driver
    pub name: String,
    /// Driver name (V4L2 QUERYCAP)
    pub driver: String,
    /// Device path (e.g., /dev/video0)
    pub path: String,
}

/// Pixel layout of [`CameraFrame::data`]
///
/// Sources convert whatever the driver delivers into one of these before the
/// frame leaves the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
    /// Gray8 - 8-bit grayscale (single channel)
    Gray8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::RGBA => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// A single frame from a source
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Pixel data, `stride` bytes per row
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride (bytes per row, may include padding)
    pub stride: u32,
    /// Driver sequence number or running counter
    pub sequence: u64,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a tightly packed RGBA frame
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, sequence: u64) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            format: PixelFormat::RGBA,
            stride: width * 4,
            sequence,
            captured_at: Instant::now(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Check that `data` covers every row the header describes
    pub fn is_complete(&self) -> bool {
        let row_bytes = self.width as usize * self.format.bytes_per_pixel();
        if (self.stride as usize) < row_bytes {
            return false;
        }
        if self.height == 0 {
            return true;
        }
        let needed = (self.height as usize - 1) * self.stride as usize + row_bytes;
        self.data.len() >= needed
    }

    /// Luma of one pixel (BT.601 weights for RGBA)
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        let offset = y as usize * self.stride as usize + x as usize * self.format.bytes_per_pixel();
        match self.format {
            PixelFormat::Gray8 => self.data.get(offset).copied().unwrap_or(0),
            PixelFormat::RGBA => match self.data.get(offset..offset + 3) {
                Some(px) => {
                    let l = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
                    l.round().clamp(0.0, 255.0) as u8
                }
                None => 0,
            },
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for frame sources
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Source is not available on this system
    NotAvailable(String),
    /// Failed to open or configure the source
    InitializationFailed(String),
    /// Device or file not found
    DeviceNotFound(String),
    /// None of the acceptable pixel formats could be negotiated
    FormatNotSupported(String),
    /// Reading a frame failed
    CaptureFailed(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Source not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<image::ImageError> for BackendError {
    fn from(err: image::ImageError) -> Self {
        BackendError::Other(format!("Image decode failed: {}", err))
    }
}
