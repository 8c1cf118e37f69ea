// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion for V4L2 capture buffers
//!
//! Drivers hand out packed YUV, Bayer or RGB24 buffers. Everything is turned
//! into tightly packed RGBA here so the detector only deals with one layout.

/// BT.601 YUV to RGB for one pixel
fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
    [
        (y + 1.402 * v).clamp(0.0, 255.0) as u8,
        (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8,
        (y + 1.772 * u).clamp(0.0, 255.0) as u8,
    ]
}

/// Convert 4:2:2 packed YUV to RGBA
///
/// `order` gives the byte index of (Y0, U, Y1, V) inside each 4-byte group,
/// which is the only difference between YUYV and UYVY.
fn packed_422_to_rgba(data: &[u8], width: u32, height: u32, order: [usize; 4]) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    'outer: for chunk in data.chunks_exact(4) {
        let u = chunk[order[1]] as f32 - 128.0;
        let v = chunk[order[3]] as f32 - 128.0;

        for y in [chunk[order[0]] as f32, chunk[order[2]] as f32] {
            let [r, g, b] = yuv_to_rgb(y, u, v);
            rgba.extend_from_slice(&[r, g, b, 255]);

            if rgba.len() >= pixel_count * 4 {
                break 'outer;
            }
        }
    }

    rgba
}

/// Convert YUYV (Y0 U Y1 V) to RGBA
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    packed_422_to_rgba(data, width, height, [0, 1, 2, 3])
}

/// Convert UYVY (U Y0 V Y1) to RGBA
///
/// The Kinect color stream uses this layout at 640x480.
pub fn uyvy_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    packed_422_to_rgba(data, width, height, [1, 0, 3, 2])
}

/// Convert Bayer GRBG to RGBA using simple nearest-neighbor demosaic
///
/// Bayer pattern (GRBG):
/// ```text
/// G R
/// B G
/// ```
/// Each 2x2 block produces 4 pixels with the same RGB values.
pub fn grbg_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let mut rgba = vec![0u8; w * h * 4];
    if data.len() < w * h {
        return rgba;
    }

    for y in (0..h.saturating_sub(1)).step_by(2) {
        for x in (0..w.saturating_sub(1)).step_by(2) {
            let g0 = data[y * w + x] as u32;
            let r = data[y * w + x + 1];
            let b = data[(y + 1) * w + x];
            let g1 = data[(y + 1) * w + x + 1] as u32;
            let g = ((g0 + g1) / 2) as u8;

            for dy in 0..2 {
                for dx in 0..2 {
                    let idx = ((y + dy) * w + (x + dx)) * 4;
                    rgba[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
                }
            }
        }
    }

    rgba
}

/// Convert packed RGB24 to RGBA
pub fn rgb24_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    data.chunks_exact(3)
        .take(pixel_count)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect()
}
