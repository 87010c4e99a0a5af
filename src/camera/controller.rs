use glam::Vec2;

use crate::camera::core::Camera;
use crate::options::CameraOptions;

/// Per-frame movement intent in the range `-1..=1` on each axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Movement {
    /// Forward (+) / backward (−).
    pub forward: f32,
    /// Right (+) / left (−).
    pub right: f32,
}

impl Movement {
    /// Whether there is nothing to apply.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.right == 0.0
    }
}

/// Drives a [`Camera`] from mouse drags and held movement keys.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Controlled camera.
    pub camera: Camera,
    options: CameraOptions,
    rotate_speed: f32,
}

impl CameraController {
    /// Controller with a fresh camera built from `options`.
    #[must_use]
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            camera: Camera::from_options(options, aspect),
            options: options.clone(),
            rotate_speed: options.rotate_degrees_per_pixel.to_radians(),
        }
    }

    /// Mouse-look by a drag of `delta` pixels: horizontal drag turns about
    /// world Y, vertical drag pitches.
    pub fn rotate(&mut self, delta: Vec2) {
        let angle = delta * self.rotate_speed;
        self.camera.pitch(angle.y);
        self.camera.rotate_y(angle.x);
        self.camera.update_view_matrix();
    }

    /// Apply held-key movement for a frame of `dt` seconds.
    pub fn update(&mut self, dt: f32, movement: Movement) {
        if movement.is_idle() {
            return;
        }
        let step = self.options.move_speed * dt;
        self.camera.walk(movement.forward * step);
        self.camera.strafe(movement.right * step);
        self.camera.update_view_matrix();
    }

    /// Keep the projection in sync with the surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }
    }

    /// Return to the configured start position and orientation.
    pub fn reset(&mut self) {
        self.camera = Camera::from_options(&self.options, self.camera.aspect);
    }
}
