// SPDX-License-Identifier: GPL-3.0-only

//! QR tracker - marker-driven placement of virtual objects
//!
//! Reads frames from a webcam, a Kinect color stream or image files, finds
//! QR codes, and turns their corners into positions and rotations for a set
//! of named targets laid out on a display.
//!
//! # Architecture
//!
//! - [`geometry`]: angle and coordinate mapping, independent of any source
//! - [`backends`]: frame sources
//! - [`frame_processor`]: detection, calibration and tracking ticks
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```no_run
//! use qr_tracker::backends::camera::ImageFileSource;
//! use qr_tracker::frame_processor::{QrDetector, TargetRegistry, TrackingSession};
//! use qr_tracker::Config;
//!
//! let config = Config::default();
//! let source = ImageFileSource::open(std::path::Path::new("table.png"))?;
//! let mut session = TrackingSession::new(
//!     source,
//!     QrDetector::new(),
//!     config.display,
//!     config.tracking_region(),
//!     TargetRegistry::new(config.targets.clone()),
//!     config.projector.build(config.display),
//! );
//! let _outcome = session.tick();
//! # Ok::<(), qr_tracker::backends::camera::BackendError>(())
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod frame_processor;
pub mod geometry;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use geometry::{CalibrationRegion, Dimensions, Placement, compute_angle};
