// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Listing capture devices
//! - Running one tick on an image
//! - Calibrating the crop region
//! - Tracking targets

use crate::{Mode, SourceArgs};
use chrono::Local;
use qr_tracker::backends::camera::{
    FrameSource, ImageFileSource, SourceKind, list_devices as enumerate_devices, open_frame_source,
};
use qr_tracker::frame_processor::{
    CalibrationSession, QrDetector, SkippedMarker, TargetRegistry, TickOutcome, TrackingSession,
};
use qr_tracker::{AppError, AppResult, Config, Placement};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;

/// List V4L2 capture devices
pub fn list_devices() -> AppResult<()> {
    let devices = enumerate_devices();

    if devices.is_empty() {
        println!("No capture devices found.");
        return Ok(());
    }

    println!("Available devices:");
    println!();
    for device in &devices {
        println!("  [{}] {}", device.index, device.name);
        println!("      Path: {}", device.path);
        println!("      Driver: {}", device.driver);
        println!();
    }

    Ok(())
}

/// Run a single tick against an image file
pub fn detect(config_path: Option<PathBuf>, image: PathBuf, mode: Mode) -> AppResult<()> {
    let config = load_config(config_path)?.0;
    let source = ImageFileSource::open(&image)?;
    let detector = QrDetector::with_max_dimension(config.detector.max_dimension);

    let output = match mode {
        Mode::Calibrate => {
            let mut session = CalibrationSession::new(
                source,
                detector,
                config.display,
                config.calibration_start_region(),
            );
            let outcome = session.tick();
            json!({
                "outcome": outcome_json(&outcome),
                "region": session.region(),
            })
        }
        Mode::Track => {
            let mut session = tracking_session(&config, source, detector);
            let outcome = session.tick();
            json!({
                "outcome": outcome_json(&outcome),
                "targets": session.registry(),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run calibration ticks until Ctrl+C, then save the region
pub fn calibrate(config_path: Option<PathBuf>, overrides: &SourceArgs) -> AppResult<()> {
    let (mut config, path) = load_config(config_path)?;
    apply_source_overrides(&mut config, overrides);

    let source = open_frame_source(&config.source)?;
    let detector = QrDetector::with_max_dimension(config.detector.max_dimension);
    let mut session = CalibrationSession::new(
        source,
        detector,
        config.display,
        config.calibration_start_region(),
    );

    let stop_flag = install_stop_handler()?;
    println!("Calibrating. Show markers \"1\" and \"2\" at the region corners.");
    println!("Press Ctrl+C to save and exit.");

    let interval = Duration::from_millis(config.tick_interval_ms);
    while !stop_flag.load(Ordering::SeqCst) {
        if let TickOutcome::Processed(update) = session.tick()
            && update.changed()
        {
            let region = update.region;
            println!(
                "Region: top-left ({:.1}, {:.1}) bottom-right ({:.1}, {:.1})",
                region.top_left.x, region.top_left.y, region.bottom_right.x, region.bottom_right.y
            );
        }
        std::thread::sleep(interval);
    }

    println!();
    let Some(region) = session.confirmed_region(config.tracking_region()) else {
        println!("No calibration markers seen, region unchanged.");
        return Ok(());
    };
    config.region = Some(region);
    config.save(&path)?;
    println!("Region saved: {}", path.display());
    Ok(())
}

/// Run tracking ticks, printing one JSON line per processed tick
pub fn track(
    config_path: Option<PathBuf>,
    overrides: &SourceArgs,
    ticks: Option<u64>,
) -> AppResult<()> {
    let (mut config, _path) = load_config(config_path)?;
    apply_source_overrides(&mut config, overrides);

    let source = open_frame_source(&config.source)?;
    let detector = QrDetector::with_max_dimension(config.detector.max_dimension);
    let mut session = tracking_session(&config, source, detector);

    let stop_flag = install_stop_handler()?;
    let interval = Duration::from_millis(config.tick_interval_ms);
    let mut tick = 0u64;

    while !stop_flag.load(Ordering::SeqCst) && ticks.is_none_or(|limit| tick < limit) {
        tick += 1;
        if let TickOutcome::Processed(assignment) = session.tick() {
            let record = TrackRecord {
                timestamp: Local::now().to_rfc3339(),
                tick,
                placements: &assignment.placements,
                skipped: &assignment.skipped,
            };
            println!("{}", serde_json::to_string(&record)?);
        }
        std::thread::sleep(interval);
    }

    info!(ticks = tick, "Tracking stopped");
    Ok(())
}

#[derive(Serialize)]
struct TrackRecord<'a> {
    timestamp: String,
    tick: u64,
    placements: &'a [Placement],
    skipped: &'a [SkippedMarker],
}

fn tracking_session<S: FrameSource>(
    config: &Config,
    source: S,
    detector: QrDetector,
) -> TrackingSession<S, QrDetector> {
    TrackingSession::new(
        source,
        detector,
        config.display,
        config.tracking_region(),
        TargetRegistry::new(config.targets.clone()),
        config.projector.build(config.display),
    )
}

/// Describe a tick outcome as JSON
fn outcome_json<T: Serialize>(outcome: &TickOutcome<T>) -> Value {
    match outcome {
        TickOutcome::NoFrame => json!({ "status": "no-frame" }),
        TickOutcome::NoMarkers => json!({ "status": "no-markers" }),
        TickOutcome::Processed(result) => json!({ "status": "processed", "result": result }),
        TickOutcome::Failed(error) => json!({ "status": "failed", "error": error.to_string() }),
    }
}

fn load_config(path: Option<PathBuf>) -> AppResult<(Config, PathBuf)> {
    let path = path
        .or_else(Config::default_path)
        .ok_or("Could not determine the configuration directory")?;
    let config = Config::load(&path)?;
    Ok((config, path))
}

fn apply_source_overrides(config: &mut Config, overrides: &SourceArgs) {
    if let Some(source) = overrides.source {
        config.source.kind = source.into();
    }
    if let Some(device) = &overrides.device {
        config.source.device = Some(device.clone());
    }
    if let Some(image) = &overrides.image {
        config.source.image = Some(image.clone());
        if overrides.source.is_none() {
            config.source.kind = SourceKind::ImageFile;
        }
    }
}

fn install_stop_handler() -> AppResult<Arc<AtomicBool>> {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = Arc::clone(&stop_flag);
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Other(format!("Failed to install Ctrl+C handler: {}", e)))?;
    Ok(stop_flag)
}
