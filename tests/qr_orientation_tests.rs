// SPDX-License-Identifier: GPL-3.0-only

//! Decoding a real QR symbol at several rotations

use glam::DVec2;
use qr_tracker::backends::camera::CameraFrame;
use qr_tracker::compute_angle;
use qr_tracker::errors::GeometryError;
use qr_tracker::frame_processor::{MarkerDetector, QrDetector};

/// Version 1-L symbol encoding the numeric payload "1", mask 0
const SYMBOL_ONE: [&str; 21] = [
    "#######..#.##.#######",
    "#.....#..###..#.....#",
    "#.###.#.##.##.#.###.#",
    "#.###.#..#.#..#.###.#",
    "#.###.#...#.#.#.###.#",
    "#.....#.....#.#.....#",
    "#######.#.#.#.#######",
    "........##.##........",
    "###.########.##...#..",
    "...#.#..#.#...#...##.",
    "##.#..####..#...#...#",
    "..##.#.#.#....#...##.",
    "..#.####....#.#.#.###",
    "........#.##.#.#.#.#.",
    "#######.#..#.###.####",
    "#.....#.#..###.###.#.",
    "#.###.#.#..#.###.##.#",
    "#.###.#..#....#...##.",
    "#.###.#.#...#...#...#",
    "#.....#.##....#...#..",
    "#######.#.#.#.#.#.#.#",
];

const MODULES: usize = 21;
const MODULE_PX: f64 = 8.0;
const QUIET: f64 = 4.0;
const CANVAS: u32 = 360;

/// Symbol laid out upright, centred on a square canvas
struct Layout {
    centre: DVec2,
    /// Clockwise on screen (Y down), in degrees
    rotation: f64,
}

impl Layout {
    fn new(rotation: f64) -> Self {
        Self {
            centre: DVec2::splat(CANVAS as f64 / 2.0),
            rotation,
        }
    }

    fn turn(&self) -> DVec2 {
        DVec2::from_angle(self.rotation.to_radians())
    }

    /// Canvas pixel of a point given in symbol module coordinates
    fn to_canvas(&self, module: DVec2) -> DVec2 {
        let half = MODULES as f64 / 2.0;
        let upright = (module - DVec2::splat(half)) * MODULE_PX;
        self.centre + self.turn().rotate(upright)
    }

    /// Whether the canvas pixel at `p` is dark
    fn is_dark(&self, p: DVec2) -> bool {
        let half = MODULES as f64 / 2.0;
        let undo = self.turn() * DVec2::new(1.0, -1.0);
        let upright = undo.rotate(p - self.centre);
        let module = upright / MODULE_PX + DVec2::splat(half);
        if module.x < 0.0 || module.y < 0.0 {
            return false;
        }
        let (col, row) = (module.x as usize, module.y as usize);
        SYMBOL_ONE
            .get(row)
            .and_then(|line| line.as_bytes().get(col))
            .is_some_and(|&b| b == b'#')
    }

    fn render(&self) -> CameraFrame {
        let mut data = Vec::with_capacity((CANVAS * CANVAS * 4) as usize);
        for y in 0..CANVAS {
            for x in 0..CANVAS {
                let centre = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let value = if self.is_dark(centre) { 0 } else { 255 };
                data.extend_from_slice(&[value, value, value, 255]);
            }
        }
        CameraFrame::from_rgba(CANVAS, CANVAS, data, 0)
    }
}

/// Distance between two angles in degrees, modulo 360
fn angle_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[test]
fn test_symbol_fits_canvas_with_quiet_zone() {
    // Diagonal of symbol plus quiet zone must fit at any rotation
    let span = (MODULES as f64 + 2.0 * QUIET) * MODULE_PX * std::f64::consts::SQRT_2;
    assert!(span <= CANVAS as f64);
}

#[test]
fn test_finder_centres_follow_rotation() {
    let detector = QrDetector::new();

    for rotation in [0.0, 30.0, 90.0, 180.0, 270.0, 300.0] {
        let layout = Layout::new(rotation);
        let markers = detector.detect(&layout.render()).unwrap();
        assert_eq!(markers.len(), 1, "rotation {rotation}");

        let marker = &markers[0];
        assert_eq!(marker.id, "1");

        let expected = [
            layout.to_canvas(DVec2::new(3.5, 17.5)),
            layout.to_canvas(DVec2::new(3.5, 3.5)),
            layout.to_canvas(DVec2::new(17.5, 3.5)),
        ];
        for (found, want) in marker.points.iter().zip(expected) {
            assert!(
                (*found - want).length() < 1.5 * MODULE_PX,
                "rotation {rotation}: {found} far from {want}"
            );
        }

        // A symbol turned clockwise by r reads as 360 - r
        let want = (360.0 - rotation).rem_euclid(360.0);
        match compute_angle(&marker.points) {
            Ok(angle) => assert!(
                angle_gap(angle, want) < 3.0,
                "rotation {rotation}: angle {angle}, expected {want}"
            ),
            // Top-left and top-right centres can share a column exactly
            Err(GeometryError::DegenerateCorners) => {
                assert!(rotation == 90.0 || rotation == 270.0, "rotation {rotation}")
            }
            Err(e) => panic!("rotation {rotation}: {e}"),
        }
    }
}
