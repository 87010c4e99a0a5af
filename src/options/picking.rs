use serde::{Deserialize, Serialize};

use crate::picking::BARYCENTRIC_EPSILON;
use crate::scene::Material;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Triangle picking parameters.
pub struct PickingOptions {
    /// Tolerance at triangle edges; keeps rays aimed at a shared edge
    /// from slipping between the two triangles.
    pub barycentric_epsilon: f32,
    /// Renormalize the ray direction after moving it into object space,
    /// so the hit parameter is a distance in local units. When off, the
    /// hit parameter is measured along the unnormalized view-space ray.
    pub normalize_local_direction: bool,
    /// Material of the highlight drawn over the picked triangle.
    pub highlight: Material,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            barycentric_epsilon: BARYCENTRIC_EPSILON,
            normalize_local_direction: true,
            highlight: Material::flat([0.0, 0.8, 0.4, 1.0]),
        }
    }
}
