// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use glam::{DVec2, DVec3};
use qr_tracker::backends::camera::SourceKind;
use qr_tracker::config::ProjectorConfig;
use qr_tracker::{CalibrationRegion, Config, Dimensions};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qr-tracker-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.source.kind, SourceKind::Webcam);
    assert_eq!(config.display, Dimensions::new(1920, 1080));
    assert_eq!(config.region, None);
    assert_eq!(config.targets.len(), 4);
    assert_eq!(config.targets[0], "block-1");
}

#[test]
fn test_default_regions_match_scene_values() {
    let config = Config::default();

    let tracking = config.tracking_region();
    assert_eq!(tracking.top_left, DVec2::new(300.0, 0.0));
    assert_eq!(tracking.bottom_right, DVec2::new(1650.0, 800.0));

    let calibration = config.calibration_start_region();
    assert_eq!(calibration.top_left, DVec2::new(227.0, 13.0));
    assert_eq!(calibration.bottom_right, DVec2::new(1082.0, 495.0));
}

#[test]
fn test_saved_region_is_used_by_both_modes() {
    let region = CalibrationRegion::new(DVec2::new(1.0, 2.0), DVec2::new(3.0, 4.0));
    let config = Config {
        region: Some(region),
        ..Config::default()
    };

    assert_eq!(config.tracking_region(), region);
    assert_eq!(config.calibration_start_region(), region);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = scratch_dir("missing");
    let config = Config::load(&dir.join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_load() {
    let dir = scratch_dir("roundtrip");
    let path = dir.join("nested").join("config.json");

    let config = Config {
        region: Some(CalibrationRegion::new(DVec2::new(10.0, 20.0), DVec2::new(900.0, 600.0))),
        targets: vec!["cube".to_string(), "sphere".to_string()],
        projector: ProjectorConfig::Orthographic {
            position: DVec3::new(0.0, 1.0, -10.0),
            size: 3.5,
        },
        ..Config::default()
    };
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = scratch_dir("partial");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(
        &path,
        r#"{
            "source": { "kind": "image-file", "image": "/tmp/frames" },
            "projector": { "type": "display" }
        }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.source.kind, SourceKind::ImageFile);
    assert_eq!(config.source.image, Some(PathBuf::from("/tmp/frames")));
    assert_eq!(config.projector, ProjectorConfig::Display);
    assert_eq!(config.display, Dimensions::new(1920, 1080));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = scratch_dir("malformed");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load(&path).is_err());

    let _ = std::fs::remove_dir_all(&dir);
}
