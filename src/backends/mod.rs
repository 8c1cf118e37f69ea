// SPDX-License-Identifier: GPL-3.0-only

//! Frame acquisition backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          Calibration / Tracking sessions     │
//! └────────────────────┬────────────────────────┘
//!                      │  FrameSource
//! ┌────────────────────┴────────────────────────┐
//! │  ┌─────────────┐ ┌──────────────┐ ┌───────┐ │
//! │  │   Webcam    │ │ Depth camera │ │ Image │ │
//! │  │   (V4L2)    │ │ (Kinect V4L2)│ │ files │ │
//! │  └─────────────┘ └──────────────┘ └───────┘ │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - [`camera`]: the `FrameSource` trait, its implementations and pixel conversion

pub mod camera;
