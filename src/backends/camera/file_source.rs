// SPDX-License-Identifier: GPL-3.0-only

//! Image file frame source
//!
//! Serves a still image, or every image in a directory in name order,
//! as a looping sequence of frames. Used for offline runs and tests.

use super::FrameSource;
use super::types::{BackendError, BackendResult, CameraFrame};
use crate::constants::file_formats;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load an image file as an RGBA frame
pub fn load_image_as_frame(path: &Path, sequence: u64) -> BackendResult<CameraFrame> {
    let img = image::open(path).map_err(|e| {
        BackendError::Other(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    debug!(path = %path.display(), width, height, "Image loaded");
    Ok(CameraFrame::from_rgba(width, height, rgba.into_raw(), sequence))
}

/// Looping source over one or more image files
pub struct ImageFileSource {
    paths: Vec<PathBuf>,
    next: usize,
    sequence: u64,
}

impl ImageFileSource {
    /// Open a single image or a directory of images
    pub fn open(path: &Path) -> BackendResult<Self> {
        if !path.exists() {
            return Err(BackendError::DeviceNotFound(path.display().to_string()));
        }

        let paths = if path.is_dir() {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| has_image_extension(p))
                .collect();
            paths.sort();
            paths
        } else {
            vec![path.to_path_buf()]
        };

        if paths.is_empty() {
            return Err(BackendError::NotAvailable(format!(
                "No images found in {}",
                path.display()
            )));
        }

        info!(path = %path.display(), count = paths.len(), "Image source opened");
        Ok(Self {
            paths,
            next: 0,
            sequence: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageFileSource {
    fn name(&self) -> String {
        match self.paths.as_slice() {
            [single] => single.display().to_string(),
            many => format!("{} images", many.len()),
        }
    }

    fn next_frame(&mut self) -> BackendResult<Option<CameraFrame>> {
        let path = &self.paths[self.next];
        let frame = load_image_as_frame(path, self.sequence)?;
        self.next = (self.next + 1) % self.paths.len();
        self.sequence += 1;
        Ok(Some(frame))
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(file_formats::is_image_extension)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qr-tracker-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let result = ImageFileSource::open(Path::new("/nonexistent/qr-tracker/frame.png"));
        assert!(matches!(result, Err(BackendError::DeviceNotFound(_))));
    }

    #[test]
    fn test_directory_cycles_in_name_order() {
        let dir = temp_dir("cycle");
        image::RgbaImage::new(4, 2).save(dir.join("b.png")).unwrap();
        image::RgbaImage::new(2, 2).save(dir.join("a.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut source = ImageFileSource::open(&dir).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        let third = source.next_frame().unwrap().unwrap();
        assert_eq!((first.width, second.width, third.width), (2, 4, 2));
        assert_eq!(third.sequence, 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_directory_is_rejected() {
        let dir = temp_dir("empty");
        let result = ImageFileSource::open(&dir);
        assert!(matches!(result, Err(BackendError::NotAvailable(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
