use glam::{Mat3, Mat4, Vec3};

use crate::options::CameraOptions;

/// First-person perspective camera in a left-handed world (+Z forward,
/// +Y up, +X right).
///
/// `right`, `up` and `look` form an orthonormal basis that
/// [`Camera::update_view_matrix`] re-orthonormalizes after every
/// movement; the cached view matrix is only valid after that call.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Camera +X axis in world space.
    pub right: Vec3,
    /// Camera +Y axis in world space.
    pub up: Vec3,
    /// Camera +Z (viewing) axis in world space.
    pub look: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    view: Mat4,
    proj: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_options(&CameraOptions::default(), 1.0)
    }
}

impl Camera {
    /// Camera at the configured position looking down +Z.
    #[must_use]
    pub fn from_options(options: &CameraOptions, aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::from(options.position),
            right: Vec3::X,
            up: Vec3::Y,
            look: Vec3::Z,
            fovy: options.fovy,
            aspect,
            znear: options.znear,
            zfar: options.zfar,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        camera.set_lens(options.fovy, aspect, options.znear, options.zfar);
        camera.update_view_matrix();
        camera
    }

    /// Set the projection parameters and rebuild the projection matrix.
    pub fn set_lens(&mut self, fovy: f32, aspect: f32, znear: f32, zfar: f32) {
        self.fovy = fovy;
        self.aspect = aspect;
        self.znear = znear;
        self.zfar = zfar;
        // perspective_lh maps depth to [0,1] (wgpu convention)
        self.proj = Mat4::perspective_lh(fovy.to_radians(), aspect, znear, zfar);
    }

    /// Update only the aspect ratio, e.g. after a window resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.set_lens(self.fovy, aspect, self.znear, self.zfar);
    }

    /// Move along the viewing direction.
    pub fn walk(&mut self, distance: f32) {
        self.position += self.look * distance;
    }

    /// Move sideways along the right axis.
    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right * distance;
    }

    /// Rotate `up` and `look` about the right axis. Positive angles tilt
    /// the view downward.
    pub fn pitch(&mut self, angle: f32) {
        let rotation = Mat3::from_axis_angle(self.right, angle);
        self.up = rotation * self.up;
        self.look = rotation * self.look;
    }

    /// Rotate the whole basis about the world Y axis. Positive angles turn
    /// the view to the right.
    pub fn rotate_y(&mut self, angle: f32) {
        let rotation = Mat3::from_rotation_y(angle);
        self.right = rotation * self.right;
        self.up = rotation * self.up;
        self.look = rotation * self.look;
    }

    /// Re-orthonormalize the basis and rebuild the view matrix.
    pub fn update_view_matrix(&mut self) {
        self.look = self.look.normalize_or(Vec3::Z);
        self.up = self.look.cross(self.right).normalize_or(Vec3::Y);
        self.right = self.up.cross(self.look);
        self.view = Mat4::look_to_lh(self.position, self.look, self.up);
    }

    /// World → view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// View → clip matrix.
    #[must_use]
    pub fn proj(&self) -> Mat4 {
        self.proj
    }

    /// World → clip matrix.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }

    /// View → world matrix.
    #[must_use]
    pub fn inverse_view(&self) -> Mat4 {
        self.view.inverse()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn default_camera_matches_options() {
        let camera = Camera::from_options(&CameraOptions::default(), 4.0 / 3.0);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, -15.0));
        assert_eq!(camera.look, Vec3::Z);
        // Eye maps to the view origin, the look axis to +Z.
        let view = camera.view();
        assert!(view.transform_point3(camera.position).abs_diff_eq(Vec3::ZERO, 1e-5));
        let ahead = camera.position + Vec3::Z * 5.0;
        assert!(view.transform_point3(ahead).abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
    }

    #[test]
    fn projection_focal_terms() {
        let camera = Camera::from_options(&CameraOptions::default(), 2.0);
        let focal_y = 1.0 / (22.5_f32.to_radians()).tan();
        assert!((camera.proj().y_axis.y - focal_y).abs() < 1e-5);
        assert!((camera.proj().x_axis.x - focal_y / 2.0).abs() < 1e-5);
    }

    #[test]
    fn walk_and_strafe_follow_basis() {
        let mut camera = Camera::default();
        camera.walk(3.0);
        camera.strafe(-1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(-1.0, 2.0, -12.0), 1e-6));
    }

    #[test]
    fn rotate_y_turns_right() {
        let mut camera = Camera::default();
        camera.rotate_y(FRAC_PI_2);
        camera.update_view_matrix();
        assert!(camera.look.abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.right.abs_diff_eq(-Vec3::Z, 1e-6));
        assert!(camera.up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn positive_pitch_looks_down() {
        let mut camera = Camera::default();
        camera.pitch(0.1);
        camera.update_view_matrix();
        assert!(camera.look.y < 0.0);
        assert!(camera.look.dot(camera.up).abs() < 1e-6);
        assert!(camera.look.dot(camera.right).abs() < 1e-6);
    }

    #[test]
    fn inverse_view_restores_eye() {
        let mut camera = Camera::default();
        camera.rotate_y(0.4);
        camera.pitch(-0.2);
        camera.update_view_matrix();
        let eye = camera.inverse_view().transform_point3(Vec3::ZERO);
        assert!(eye.abs_diff_eq(camera.position, 1e-5));
    }
}
