// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the tracker

use crate::backends::camera::BackendError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Frame source errors
    Backend(BackendError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Errors raised by the marker geometry functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Fewer feature points than the operation needs
    InsufficientPoints { found: usize },
    /// The two opposing corners share an X coordinate (or are not finite)
    DegenerateCorners,
    /// A source image with zero width or height
    EmptySource,
}

/// Errors raised while locating markers in a frame
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// Frame buffer is shorter than its declared geometry
    InvalidFrame(String),
    /// The calibration region does not overlap the frame
    EmptyCrop,
    /// The barcode library failed as a whole
    DecoderFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Backend(e) => write!(f, "Frame source error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InsufficientPoints { found } => {
                write!(f, "Need at least 3 feature points, got {}", found)
            }
            GeometryError::DegenerateCorners => {
                write!(f, "Opposing corners are vertically aligned")
            }
            GeometryError::EmptySource => write!(f, "Source image has zero size"),
        }
    }
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            DetectionError::EmptyCrop => {
                write!(f, "Calibration region does not overlap the frame")
            }
            DetectionError::DecoderFailed(msg) => write!(f, "Decoder failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for GeometryError {}
impl std::error::Error for DetectionError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Backend(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
