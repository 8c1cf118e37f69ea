// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use qr_tracker::constants::{app_info, file_formats, markers};

#[test]
fn test_calibration_ids_differ() {
    assert_ne!(markers::TOP_LEFT_ID, markers::BOTTOM_RIGHT_ID);
}

#[test]
fn test_angle_needs_three_points() {
    // Reference corner plus the two opposing corners
    assert_eq!(markers::MIN_FEATURE_POINTS, 3);
}

#[test]
fn test_image_extensions_case_insensitive() {
    assert!(file_formats::is_image_extension("png"));
    assert!(file_formats::is_image_extension("JPG"));
    assert!(!file_formats::is_image_extension("txt"));
}

#[test]
fn test_version_not_empty() {
    assert!(!app_info::version().is_empty());
}
