// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Calibration region defaults in display pixels
pub mod region {
    /// Top-left corner shown before the first calibration marker is seen
    pub const CALIBRATION_TOP_LEFT: (f64, f64) = (227.0, 13.0);

    /// Bottom-right corner shown before the first calibration marker is seen
    pub const CALIBRATION_BOTTOM_RIGHT: (f64, f64) = (1082.0, 495.0);

    /// Top-left corner of the tracking crop when nothing has been calibrated
    pub const TRACKING_TOP_LEFT: (f64, f64) = (300.0, 0.0);

    /// Bottom-right corner of the tracking crop when nothing has been calibrated
    pub const TRACKING_BOTTOM_RIGHT: (f64, f64) = (1650.0, 800.0);
}

/// Marker payload conventions
pub mod markers {
    /// Payload of the marker that pins the region's top-left corner
    pub const TOP_LEFT_ID: &str = "1";

    /// Payload of the marker that pins the region's bottom-right corner
    pub const BOTTOM_RIGHT_ID: &str = "2";

    /// Feature points needed to place a marker (reference corner + opposing pair)
    pub const MIN_FEATURE_POINTS: usize = 3;
}

/// Display target defaults
pub mod display {
    /// Default display width in pixels
    pub const DEFAULT_WIDTH: u32 = 1920;

    /// Default display height in pixels
    pub const DEFAULT_HEIGHT: u32 = 1080;

    /// Half-height of the default orthographic view in world units
    pub const DEFAULT_ORTHOGRAPHIC_SIZE: f64 = 5.0;
}

/// QR detector tuning
pub mod detector {
    /// Frames larger than this (either side) are downscaled before decoding
    pub const DEFAULT_MAX_DIMENSION: u32 = 1280;

    /// Distance in modules from a symbol's outer corner to its finder centre
    pub const FINDER_CENTER_OFFSET: f64 = 3.5;
}

/// V4L2 capture settings
pub mod capture {
    /// Default webcam device node
    pub const DEFAULT_WEBCAM_DEVICE: &str = "/dev/video0";

    /// Preferred webcam capture size
    pub const WEBCAM_WIDTH: u32 = 1280;
    pub const WEBCAM_HEIGHT: u32 = 720;

    /// Kinect color stream size exposed by the kernel driver
    pub const KINECT_COLOR_WIDTH: u32 = 640;
    pub const KINECT_COLOR_HEIGHT: u32 = 480;

    /// Number of mmap buffers requested from the driver
    pub const STREAM_BUFFERS: u32 = 4;
}

/// Tick loop timing
pub mod timing {
    /// Delay between ticks in the CLI loops
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 33;

    /// Log a summary every N ticks
    pub const TICK_LOG_INTERVAL: u64 = 30;
}

/// Supported file formats for image sources
pub mod file_formats {
    /// Image file extensions the image source will load
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

    /// Check if extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Application information utilities
pub mod app_info {
    /// Directory name used under the platform config dir
    pub const CONFIG_DIR_NAME: &str = "qr-tracker";

    /// Config file name inside [`CONFIG_DIR_NAME`]
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
