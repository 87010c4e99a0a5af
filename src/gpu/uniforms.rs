//! GPU uniform layouts shared with `mesh.wgsl`.

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::options::{DirectionalLight, LightingOptions};
use crate::picking::checked_inverse;
use crate::scene::Material;

/// One directional light as laid out in the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Ambient color.
    pub ambient: [f32; 4],
    /// Diffuse color.
    pub diffuse: [f32; 4],
    /// Specular color.
    pub specular: [f32; 4],
    /// Direction of travel.
    pub direction: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl From<&DirectionalLight> for LightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            ambient: light.ambient,
            diffuse: light.diffuse,
            specular: light.specular,
            direction: Vec3::from(light.direction).normalize_or_zero().to_array(),
            _pad: 0.0,
        }
    }
}

/// Per-frame data: camera and lights.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub eye_position: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
    /// Directional lights.
    pub lights: [LightUniform; 3],
}

impl FrameUniform {
    /// Snapshot of the camera and lights.
    #[must_use]
    pub fn new(camera: &Camera, lighting: &LightingOptions) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye_position: camera.position.to_array(),
            _pad: 0.0,
            lights: lighting.lights.each_ref().map(LightUniform::from),
        }
    }
}

/// Material as laid out in the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Ambient reflectance.
    pub ambient: [f32; 4],
    /// Diffuse reflectance.
    pub diffuse: [f32; 4],
    /// Specular reflectance and power.
    pub specular: [f32; 4],
}

impl From<Material> for MaterialUniform {
    fn from(m: Material) -> Self {
        Self {
            ambient: m.ambient,
            diffuse: m.diffuse,
            specular: m.specular,
        }
    }
}

/// Per-draw data: transforms and material.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    /// Local → world.
    pub world: [[f32; 4]; 4],
    /// Inverse-transpose of the lighting world matrix, for normals.
    pub world_inv_transpose: [[f32; 4]; 4],
    /// Local → clip.
    pub world_view_proj: [[f32; 4]; 4],
    /// Texture coordinate transform.
    pub tex_transform: [[f32; 4]; 4],
    /// Surface material.
    pub material: MaterialUniform,
}

impl ObjectUniform {
    /// Uniform for drawing geometry through `world`.
    ///
    /// Normals are transformed by `normal_world`, which differs from
    /// `world` only for projected geometry such as planar shadows.
    #[must_use]
    pub fn new(
        world: Mat4,
        normal_world: Mat4,
        view_proj: Mat4,
        material: Material,
    ) -> Self {
        let world_inv_transpose = checked_inverse(&normal_world)
            .map_or(Mat4::IDENTITY, |inv| inv.transpose());
        Self {
            world: world.to_cols_array_2d(),
            world_inv_transpose: world_inv_transpose.to_cols_array_2d(),
            world_view_proj: (view_proj * world).to_cols_array_2d(),
            tex_transform: Mat4::IDENTITY.to_cols_array_2d(),
            material: material.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_are_16_byte_multiples() {
        assert_eq!(size_of::<LightUniform>(), 64);
        assert_eq!(size_of::<FrameUniform>(), 64 + 16 + 3 * 64);
        assert_eq!(size_of::<MaterialUniform>(), 48);
        assert_eq!(size_of::<ObjectUniform>(), 4 * 64 + 48);
        assert_eq!(size_of::<ObjectUniform>() % 16, 0);
    }

    #[test]
    fn frame_uniform_copies_camera() {
        let camera = Camera::default();
        let frame = FrameUniform::new(&camera, &LightingOptions::default());
        assert_eq!(frame.eye_position, [0.0, 2.0, -15.0]);
        assert_eq!(frame.view_proj, camera.view_proj().to_cols_array_2d());
        let d = Vec3::from(frame.lights[0].direction);
        assert!((d.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn singular_normal_matrix_falls_back_to_identity() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        let u = ObjectUniform::new(flat, flat, Mat4::IDENTITY, Material::default());
        assert_eq!(u.world_inv_transpose, Mat4::IDENTITY.to_cols_array_2d());
    }
}
