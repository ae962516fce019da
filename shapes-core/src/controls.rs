/// Orbit camera controls driven by accumulated pointer or keyboard input
use std::f32::consts::PI;

use nalgebra::Vector3;

use crate::projection::Camera;

/// Keeps the polar angle off the poles so `look_at` stays well defined
const POLAR_EPSILON: f32 = 1.0e-3;

/// Rotates the camera around its target on a sphere and zooms along the view ray.
///
/// Input is only accumulated by [`rotate`](Self::rotate) and
/// [`zoom`](Self::zoom); the camera moves when [`update`](Self::update) runs,
/// once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub min_distance: f32,
    pub max_distance: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            min_distance: 0.5,
            max_distance: 500.0,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 1.0,
        }
    }

    /// Queue a rotation in radians: `azimuth` around the up axis, `polar` towards it
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.pending_azimuth += azimuth;
        self.pending_polar += polar;
    }

    /// Queue a multiplicative change of the camera distance (> 1 moves away)
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.pending_zoom *= factor;
        }
    }

    pub fn has_pending_input(&self) -> bool {
        self.pending_azimuth != 0.0 || self.pending_polar != 0.0 || self.pending_zoom != 1.0
    }

    /// Apply queued input to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.has_pending_input() {
            return false;
        }

        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            self.clear();
            return false;
        }

        let azimuth = offset.x.atan2(offset.z) - self.pending_azimuth;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() - self.pending_polar)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * self.pending_zoom).clamp(self.min_distance, self.max_distance);

        let direction = Vector3::new(
            polar.sin() * azimuth.sin(),
            polar.cos(),
            polar.sin() * azimuth.cos(),
        );
        camera.position = camera.target + direction * radius;

        self.clear();
        true
    }

    fn clear(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_zoom = 1.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
