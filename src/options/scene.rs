use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scene::Material;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// What to load and where to put it.
pub struct SceneOptions {
    /// Model file in the text mesh format. `None` draws a box.
    pub model_path: Option<PathBuf>,
    /// Model translation.
    pub translation: [f32; 3],
    /// Model scale.
    pub scale: [f32; 3],
    /// Model material.
    pub material: Material,
    /// Material used when drawing the model's planar shadow.
    pub shadow_material: Material,
    /// Project the model's shadow onto the ground plane.
    pub draw_shadows: bool,
    /// Add a ground grid at `y = 0`.
    pub ground: bool,
    /// Ground grid edge length.
    pub ground_size: f32,
    /// Ground material.
    pub ground_material: Material,
    /// Framebuffer clear colour.
    pub clear_color: [f32; 4],
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            model_path: None,
            translation: [0.0, 1.0, 0.0],
            scale: [0.5, 0.5, 0.5],
            material: Material::default(),
            shadow_material: Material::flat([0.0, 0.0, 0.0, 0.5]),
            draw_shadows: false,
            ground: true,
            ground_size: 40.0,
            ground_material: Material {
                ambient: [0.3, 0.3, 0.35, 1.0],
                diffuse: [0.5, 0.5, 0.55, 1.0],
                specular: [0.1, 0.1, 0.1, 8.0],
            },
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
