// SPDX-License-Identifier: GPL-3.0-only

//! Display-to-world projection
//!
//! The projector is whatever turns a display pixel into a world point: a
//! game engine camera, a GUI canvas transform, or nothing at all. Only the
//! trait matters to the geometry code.

use super::types::Dimensions;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Converts display-space points (origin bottom-left, Y up) into world space
pub trait ViewportProjector {
    fn display_to_world(&self, point: DVec2) -> DVec3;
}

/// Identity projection: world coordinates are display coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayProjector;

impl ViewportProjector for DisplayProjector {
    fn display_to_world(&self, point: DVec2) -> DVec3 {
        point.extend(0.0)
    }
}

/// Orthographic camera looking down -Z
///
/// `size` is half the visible height in world units; the visible width
/// follows from the viewport aspect ratio. The viewport center maps to
/// `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthographicProjector {
    pub position: DVec3,
    pub size: f64,
    pub viewport: Dimensions,
}

impl OrthographicProjector {
    pub fn new(position: DVec3, size: f64, viewport: Dimensions) -> Self {
        Self {
            position,
            size,
            viewport,
        }
    }

    /// World-space width and height of the visible area
    pub fn visible_extent(&self) -> DVec2 {
        let aspect = if self.viewport.height == 0 {
            1.0
        } else {
            self.viewport.width as f64 / self.viewport.height as f64
        };
        DVec2::new(2.0 * self.size * aspect, 2.0 * self.size)
    }
}

impl ViewportProjector for OrthographicProjector {
    fn display_to_world(&self, point: DVec2) -> DVec3 {
        let viewport = self.viewport.as_dvec2().max(DVec2::ONE);
        let normalized = point / viewport - DVec2::splat(0.5);
        let offset = normalized * self.visible_extent();
        DVec3::new(
            self.position.x + offset.x,
            self.position.y + offset.y,
            self.position.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthographic_center_maps_to_position() {
        let projector = OrthographicProjector::new(
            DVec3::new(2.0, -1.0, -10.0),
            5.0,
            Dimensions::new(1920, 1080),
        );
        let world = projector.display_to_world(DVec2::new(960.0, 540.0));
        assert!((world.x - 2.0).abs() < 1e-9);
        assert!((world.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthographic_corners() {
        let projector = OrthographicProjector::new(DVec3::ZERO, 5.0, Dimensions::new(1600, 800));
        // aspect 2:1, half-height 5 => visible area 20 x 10
        let bottom_left = projector.display_to_world(DVec2::ZERO);
        let top_right = projector.display_to_world(DVec2::new(1600.0, 800.0));
        assert!((bottom_left.x + 10.0).abs() < 1e-9);
        assert!((bottom_left.y + 5.0).abs() < 1e-9);
        assert!((top_right.x - 10.0).abs() < 1e-9);
        assert!((top_right.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_projector_is_identity() {
        let world = DisplayProjector.display_to_world(DVec2::new(12.5, 40.0));
        assert_eq!(world, DVec3::new(12.5, 40.0, 0.0));
    }
}
