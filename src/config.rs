// SPDX-License-Identifier: GPL-3.0-only

//! Configuration file
//!
//! Which source to open, the display size, the saved calibration region,
//! and the ordered target list that marker payloads index into. The file is
//! JSON; missing fields fall back to defaults.

use crate::backends::camera::SourceKind;
use crate::constants::{app_info, detector, display, timing};
use crate::errors::{AppError, AppResult};
use crate::geometry::{
    CalibrationRegion, Dimensions, DisplayProjector, OrthographicProjector, ViewportProjector,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Frame source selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Which source implementation to open
    pub kind: SourceKind,
    /// V4L2 device node; `None` picks the default webcam or auto-detects the Kinect
    pub device: Option<String>,
    /// Image file or directory for [`SourceKind::ImageFile`]
    pub image: Option<PathBuf>,
}

/// How display points become world points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProjectorConfig {
    /// World coordinates are display coordinates
    Display,
    /// Orthographic camera centered at `position` showing `2 * size` world units vertically
    Orthographic { position: DVec3, size: f64 },
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self::Orthographic {
            position: DVec3::ZERO,
            size: display::DEFAULT_ORTHOGRAPHIC_SIZE,
        }
    }
}

impl ProjectorConfig {
    /// Build the projector for a viewport of the given size
    pub fn build(&self, viewport: Dimensions) -> Box<dyn ViewportProjector> {
        match self {
            Self::Display => Box::new(DisplayProjector),
            Self::Orthographic { position, size } => {
                Box::new(OrthographicProjector::new(*position, *size, viewport))
            }
        }
    }
}

/// QR detector tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Frames larger than this on either side are downscaled before decoding
    pub max_dimension: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_dimension: detector::DEFAULT_MAX_DIMENSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame source selection
    pub source: SourceConfig,
    /// Output display size in pixels
    pub display: Dimensions,
    /// Region saved by the last confirmed calibration
    pub region: Option<CalibrationRegion>,
    /// Targets addressed by marker payloads "1", "2", ...
    pub targets: Vec<String>,
    /// Display-to-world projection
    pub projector: ProjectorConfig,
    /// Detector tuning
    pub detector: DetectorConfig,
    /// Delay between ticks in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            display: Dimensions::new(display::DEFAULT_WIDTH, display::DEFAULT_HEIGHT),
            region: None,
            targets: (1..=4).map(|i| format!("block-{}", i)).collect(),
            projector: ProjectorConfig::default(),
            detector: DetectorConfig::default(),
            tick_interval_ms: timing::DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl Config {
    /// `<config_dir>/qr-tracker/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(app_info::CONFIG_DIR_NAME)
                .join(app_info::CONFIG_FILE_NAME)
        })
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Region tracking should crop to
    pub fn tracking_region(&self) -> CalibrationRegion {
        self.region.unwrap_or_else(CalibrationRegion::tracking_default)
    }

    /// Region a calibration run starts from
    pub fn calibration_start_region(&self) -> CalibrationRegion {
        self.region
            .unwrap_or_else(CalibrationRegion::calibration_default)
    }
}
