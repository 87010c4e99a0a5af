use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::mesh::Mesh;
use crate::picking::{checked_inverse, PickError};

/// Surface reflectance used by the lighting shader.
///
/// `specular[3]` holds the specular power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient reflectance (RGBA).
    pub ambient: [f32; 4],
    /// Diffuse reflectance (RGBA, alpha used for blending).
    pub diffuse: [f32; 4],
    /// Specular reflectance (RGB) and power (A).
    pub specular: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.4, 0.4, 0.4, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.8, 0.8, 0.8, 16.0],
        }
    }
}

impl Material {
    /// Flat material with no specular highlight.
    #[must_use]
    pub fn flat(color: [f32; 4]) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            specular: [0.0, 0.0, 0.0, 16.0],
        }
    }
}

/// Which material a draw pass reads from an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialPass {
    /// Regular lit pass.
    Lit,
    /// Planar shadow pass.
    Shadow,
}

/// Translation, rotation and scale, composed as scale → rotate →
/// translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space offset.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Local → world matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A drawable, pickable mesh with its placement and materials.
#[derive(Debug, Clone)]
pub struct RenderObject {
    /// Display name, used in log output and GPU labels.
    pub name: String,
    /// Local-space geometry.
    pub mesh: Mesh,
    /// Placement in the world.
    pub transform: Transform,
    /// Material for the lit pass.
    pub material: Material,
    /// Material for the planar shadow pass.
    pub shadow_material: Option<Material>,
    /// Whether picking considers this object.
    pub pickable: bool,
}

impl RenderObject {
    /// Object at the origin with the default material.
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Transform::default(),
            material: Material::default(),
            shadow_material: None,
            pickable: true,
        }
    }

    /// Move by `offset`.
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.transform.translation += offset;
        self
    }

    /// Multiply the current scale componentwise.
    pub fn scale(&mut self, factor: Vec3) -> &mut Self {
        self.transform.scale *= factor;
        self
    }

    /// Compose an additional rotation.
    pub fn rotate(&mut self, rotation: Quat) -> &mut Self {
        self.transform.rotation = (rotation * self.transform.rotation).normalize();
        self
    }

    /// Local → world matrix.
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// World → local matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::SingularTransform`] when a scale component is
    /// zero.
    pub fn inverse_world_matrix(&self) -> Result<Mat4, PickError> {
        checked_inverse(&self.world_matrix())
    }

    /// Material for the given pass; the shadow pass falls back to the
    /// lit material when no shadow material is set.
    #[must_use]
    pub fn material_for(&self, pass: MaterialPass) -> Material {
        match pass {
            MaterialPass::Lit => self.material,
            MaterialPass::Shadow => self.shadow_material.unwrap_or(self.material),
        }
    }
}

/// Matrix flattening geometry onto `plane` (`n · p + d = 0`, `plane =
/// (n, d)`) along a directional light travelling in `light_dir`.
///
/// Matches the classic planar projection `dot(P, L) I - L P^T` with
/// `L = (-light_dir, 0)`.
#[must_use]
pub fn shadow_matrix(plane: Vec4, light_dir: Vec3) -> Mat4 {
    let n = plane.truncate();
    let len = n.length();
    let plane = if len > 0.0 { plane / len } else { plane };
    let l = (-light_dir).extend(0.0);
    let d = plane.dot(l);

    // Column j of (d * I - l * plane^T).
    let col = |j: usize, e: Vec4| e * d - l * plane[j];
    Mat4::from_cols(
        col(0, Vec4::X),
        col(1, Vec4::Y),
        col(2, Vec4::Z),
        col(3, Vec4::W),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> RenderObject {
        RenderObject::new("test", Mesh::default())
    }

    #[test]
    fn placement_accumulates() {
        let mut obj = object();
        let _ = obj
            .translate(Vec3::new(0.0, 1.0, 0.0))
            .translate(Vec3::new(2.0, 0.0, 0.0))
            .scale(Vec3::splat(0.5))
            .scale(Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(obj.transform.translation, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(obj.transform.scale, Vec3::new(1.0, 0.5, 0.5));
    }

    #[test]
    fn world_matrix_scales_before_translating() {
        let mut obj = object();
        let _ = obj.translate(Vec3::new(0.0, 1.0, 0.0)).scale(Vec3::splat(0.5));
        let p = obj.world_matrix().transform_point3(Vec3::new(2.0, 2.0, 2.0));
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), 1e-6));

        let inv = obj.inverse_world_matrix().unwrap();
        assert!(inv.transform_point3(p).abs_diff_eq(Vec3::splat(2.0), 1e-5));
    }

    #[test]
    fn zero_scale_is_singular() {
        let mut obj = object();
        let _ = obj.scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(obj.inverse_world_matrix(), Err(PickError::SingularTransform));
    }

    #[test]
    fn shadow_material_falls_back() {
        let mut obj = object();
        assert_eq!(obj.material_for(MaterialPass::Shadow), obj.material);
        let dark = Material::flat([0.0, 0.0, 0.0, 0.5]);
        obj.shadow_material = Some(dark);
        assert_eq!(obj.material_for(MaterialPass::Shadow), dark);
        assert_eq!(obj.material_for(MaterialPass::Lit), Material::default());
    }

    #[test]
    fn shadow_matrix_lands_on_plane() {
        let ground = Vec4::new(0.0, 1.0, 0.0, 0.0);
        let light = Vec3::new(0.57735, -0.57735, 0.57735);
        let m = shadow_matrix(ground, light);

        let p = Vec3::new(1.0, 2.0, 3.0);
        let s = m.project_point3(p);
        assert!(s.y.abs() < 1e-5);
        // Shadow is displaced along the light direction.
        let travel = (s - p).normalize();
        assert!(travel.abs_diff_eq(light.normalize(), 1e-4));
    }
}
