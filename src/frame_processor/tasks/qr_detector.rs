// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection task
//!
//! This module implements QR code detection using the rqrr crate.
//! It converts camera frames to grayscale and searches for QR codes,
//! returning their finder pattern centres and decoded content.

use super::MarkerDetector;
use crate::backends::camera::CameraFrame;
use crate::constants::detector::{DEFAULT_MAX_DIMENSION, FINDER_CENTER_OFFSET};
use crate::errors::DetectionError;
use crate::frame_processor::types::DetectedMarker;
use glam::DVec2;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, trace, warn};

/// QR code detector
///
/// Analyzes camera frames to detect and decode QR codes.
/// Large frames are downscaled before decoding and the corner points are
/// scaled back to the original frame's pixel space.
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    /// Create a new QR detector with default settings
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Create a QR detector with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }
}

impl MarkerDetector for QrDetector {
    fn detect(&self, frame: &CameraFrame) -> Result<Vec<DetectedMarker>, DetectionError> {
        if !frame.is_complete() {
            return Err(DetectionError::InvalidFrame(format!(
                "{}x{} frame with stride {} has only {} bytes",
                frame.width,
                frame.height,
                frame.stride,
                frame.data.len()
            )));
        }
        if frame.width == 0 || frame.height == 0 {
            return Ok(Vec::new());
        }

        let max_dim = self.max_dimension;
        catch_unwind(AssertUnwindSafe(|| detect_sync(frame, max_dim))).map_err(|_| {
            warn!("QR decoder panicked");
            DetectionError::DecoderFailed("decoder panicked".to_string())
        })
    }
}

/// Synchronous QR detection
fn detect_sync(frame: &CameraFrame, max_dimension: u32) -> Vec<DetectedMarker> {
    let start = std::time::Instant::now();

    let (luma, proc_width, proc_height, scale) = prepare_luma(frame, max_dimension);

    trace!(
        proc_width,
        proc_height,
        scale,
        conversion_ms = start.elapsed().as_millis(),
        "Prepared grayscale image for processing"
    );

    let width = proc_width as usize;
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width, proc_height as usize, |x, y| {
            luma[y * width + x]
        });
    let grids = prepared.detect_grids();

    let mut markers = Vec::with_capacity(grids.len());
    for grid in grids {
        let (meta, content) = match grid.decode() {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!(error = %e, "Failed to decode QR code");
                continue;
            }
        };

        let modules = meta.version.0 * 4 + 17;
        let points = finder_centres(&grid.bounds, modules, scale);

        debug!(content = %content, x = points[1].x, y = points[1].y, "Detected QR code");
        markers.push(DetectedMarker::new(content, points));
    }

    if !markers.is_empty() {
        debug!(
            count = markers.len(),
            total_ms = start.elapsed().as_millis(),
            "QR detection found codes"
        );
    }

    markers
}

/// Finder pattern centres, ordered bottom-left, top-left, top-right
///
/// `bounds` are the symbol's outer corners clockwise from its own top-left,
/// as rqrr reports them, in processed pixels. Each centre sits
/// [`FINDER_CENTER_OFFSET`] modules in from its corner along both symbol
/// axes. Perspective is ignored.
fn finder_centres(bounds: &[rqrr::Point; 4], modules: usize, scale: f64) -> Vec<DVec2> {
    let corner = |i: usize| DVec2::new(bounds[i].x as f64, bounds[i].y as f64) * scale;
    let (tl, tr, br, bl) = (corner(0), corner(1), corner(2), corner(3));
    let at = |u: f64, v: f64| tl.lerp(tr, u).lerp(bl.lerp(br, u), v);

    let near = FINDER_CENTER_OFFSET / modules as f64;
    let far = 1.0 - near;
    vec![at(near, far), at(near, near), at(far, near)]
}

/// Build a tightly packed grayscale buffer, downscaled if needed
///
/// Returns the buffer, its size, and the factor that maps processed pixels
/// back to frame pixels.
fn prepare_luma(frame: &CameraFrame, max_dimension: u32) -> (Vec<u8>, u32, u32, f64) {
    let width = frame.width;
    let height = frame.height;

    if width <= max_dimension && height <= max_dimension {
        let mut luma = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                luma.push(frame.luma(x, y));
            }
        }
        return (luma, width, height, 1.0);
    }

    let scale = (width as f64 / max_dimension as f64).max(height as f64 / max_dimension as f64);
    let dst_width = ((width as f64 / scale) as u32).max(1);
    let dst_height = ((height as f64 / scale) as u32).max(1);
    (
        downscale_luma(frame, dst_width, dst_height),
        dst_width,
        dst_height,
        scale,
    )
}

/// Downscale frame luma using bilinear interpolation
fn downscale_luma(frame: &CameraFrame, dst_width: u32, dst_height: u32) -> Vec<u8> {
    let src_width = frame.width;
    let src_height = frame.height;
    let mut result = Vec::with_capacity((dst_width * dst_height) as usize);

    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    for y in 0..dst_height {
        for x in 0..dst_width {
            let src_x = x as f32 * x_ratio;
            let src_y = y as f32 * y_ratio;

            let x0 = src_x as u32;
            let y0 = src_y as u32;
            let x1 = (x0 + 1).min(src_width - 1);
            let y1 = (y0 + 1).min(src_height - 1);

            let x_frac = src_x - x0 as f32;
            let y_frac = src_y - y0 as f32;

            let p00 = frame.luma(x0, y0) as f32;
            let p01 = frame.luma(x1, y0) as f32;
            let p10 = frame.luma(x0, y1) as f32;
            let p11 = frame.luma(x1, y1) as f32;

            let value = p00 * (1.0 - x_frac) * (1.0 - y_frac)
                + p01 * x_frac * (1.0 - y_frac)
                + p10 * (1.0 - x_frac) * y_frac
                + p11 * x_frac * y_frac;

            result.push(value as u8);
        }
    }

    result
}
