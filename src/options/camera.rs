use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Initial eye position.
    pub position: [f32; 3],
    /// Mouse-look sensitivity in degrees per pixel of drag.
    pub rotate_degrees_per_pixel: f32,
    /// Walk/strafe speed in world units per second.
    pub move_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 1.0,
            zfar: 1000.0,
            position: [0.0, 2.0, -15.0],
            rotate_degrees_per_pixel: 0.25,
            move_speed: 10.0,
        }
    }
}
