// SPDX-License-Identifier: GPL-3.0-only

//! Cropping frames to the calibration region

use crate::backends::camera::CameraFrame;
use crate::errors::DetectionError;
use crate::geometry::{CalibrationRegion, Dimensions};
use std::sync::Arc;
use tracing::trace;

/// Pixel rectangle inside a frame, `x..x + width` by `y..y + height`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Map a display-space region onto a frame's pixel grid
///
/// Corners are scaled by `frame / display`, put in min/max order, widened to
/// whole pixels and clamped to the frame.
pub fn region_to_pixels(
    region: &CalibrationRegion,
    frame: Dimensions,
    display: Dimensions,
) -> Result<PixelRect, DetectionError> {
    if frame.is_empty() || display.is_empty() {
        return Err(DetectionError::EmptyCrop);
    }

    let scale = frame.as_dvec2() / display.as_dvec2();
    let normalized = region.normalized();
    let min = normalized.top_left * scale;
    let max = normalized.bottom_right * scale;
    if !min.is_finite() || !max.is_finite() {
        return Err(DetectionError::EmptyCrop);
    }

    let x0 = min.x.floor().clamp(0.0, frame.width as f64) as u32;
    let y0 = min.y.floor().clamp(0.0, frame.height as f64) as u32;
    let x1 = max.x.ceil().clamp(0.0, frame.width as f64) as u32;
    let y1 = max.y.ceil().clamp(0.0, frame.height as f64) as u32;
    if x1 <= x0 || y1 <= y0 {
        return Err(DetectionError::EmptyCrop);
    }

    Ok(PixelRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

/// Copy the part of `frame` covered by `region`
///
/// The result is tightly packed, keeps the source pixel format and sequence
/// number, and its pixel coordinates start at the crop's top-left corner.
pub fn crop_frame(
    frame: &CameraFrame,
    region: &CalibrationRegion,
    display: Dimensions,
) -> Result<CameraFrame, DetectionError> {
    if !frame.is_complete() {
        return Err(DetectionError::InvalidFrame(format!(
            "{}x{} frame with stride {} has only {} bytes",
            frame.width,
            frame.height,
            frame.stride,
            frame.data.len()
        )));
    }

    let rect = region_to_pixels(region, frame.dimensions(), display)?;
    let bpp = frame.format.bytes_per_pixel();
    let row_bytes = rect.width as usize * bpp;
    let mut data = Vec::with_capacity(row_bytes * rect.height as usize);
    for y in rect.y..rect.y + rect.height {
        let start = y as usize * frame.stride as usize + rect.x as usize * bpp;
        data.extend_from_slice(&frame.data[start..start + row_bytes]);
    }

    trace!(?rect, "Cropped frame");

    Ok(CameraFrame {
        width: rect.width,
        height: rect.height,
        data: Arc::from(data),
        format: frame.format,
        stride: row_bytes as u32,
        sequence: frame.sequence,
        captured_at: frame.captured_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    /// 4x4 RGBA frame where every pixel's red channel is `y * 4 + x`
    fn numbered_frame() -> CameraFrame {
        let mut data = Vec::new();
        for i in 0..16u8 {
            data.extend_from_slice(&[i, 0, 0, 255]);
        }
        CameraFrame::from_rgba(4, 4, data, 7)
    }

    fn region(x0: f64, y0: f64, x1: f64, y1: f64) -> CalibrationRegion {
        CalibrationRegion::new(DVec2::new(x0, y0), DVec2::new(x1, y1))
    }

    #[test]
    fn test_crop_copies_sub_image() {
        let frame = numbered_frame();
        let cropped =
            crop_frame(&frame, &region(1.0, 1.0, 3.0, 3.0), Dimensions::new(4, 4)).unwrap();

        assert_eq!((cropped.width, cropped.height, cropped.stride), (2, 2, 8));
        assert_eq!(cropped.sequence, 7);
        let reds: Vec<u8> = cropped.data.chunks(4).map(|px| px[0]).collect();
        assert_eq!(reds, vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_region_scaled_from_display_space() {
        let rect = region_to_pixels(
            &region(480.0, 270.0, 1440.0, 810.0),
            Dimensions::new(640, 480),
            Dimensions::new(1920, 1080),
        )
        .unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 160,
                y: 120,
                width: 320,
                height: 240
            }
        );
    }

    #[test]
    fn test_reversed_corners_are_normalized() {
        let display = Dimensions::new(4, 4);
        let forward = region_to_pixels(&region(1.0, 1.0, 3.0, 3.0), display, display).unwrap();
        let reversed = region_to_pixels(&region(3.0, 3.0, 1.0, 1.0), display, display).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_region_clamped_to_frame() {
        let display = Dimensions::new(4, 4);
        let rect = region_to_pixels(&region(-10.0, 2.0, 50.0, 50.0), display, display).unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 0,
                y: 2,
                width: 4,
                height: 2
            }
        );
    }

    #[test]
    fn test_empty_crops_are_rejected() {
        let frame = numbered_frame();
        let display = Dimensions::new(4, 4);

        let outside = crop_frame(&frame, &region(10.0, 10.0, 20.0, 20.0), display);
        assert_eq!(outside.unwrap_err(), DetectionError::EmptyCrop);

        let flat = crop_frame(&frame, &region(1.0, 2.0, 3.0, 2.0), display);
        assert_eq!(flat.unwrap_err(), DetectionError::EmptyCrop);

        let no_display = crop_frame(&frame, &region(0.0, 0.0, 4.0, 4.0), Dimensions::new(0, 0));
        assert_eq!(no_display.unwrap_err(), DetectionError::EmptyCrop);
    }
}
