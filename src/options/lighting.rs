use serde::{Deserialize, Serialize};

/// A directional light: colour terms plus the direction light travels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirectionalLight {
    /// Ambient contribution (RGBA).
    pub ambient: [f32; 4],
    /// Diffuse contribution (RGBA).
    pub diffuse: [f32; 4],
    /// Specular contribution (RGBA).
    pub specular: [f32; 4],
    /// Direction the light travels (need not be normalized).
    pub direction: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [0.0, 0.0, 0.0, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            direction: [0.0, -1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Three-light rig: key, fill and back light.
pub struct LightingOptions {
    /// Key, fill and back light, in that order.
    pub lights: [DirectionalLight; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            lights: [
                DirectionalLight {
                    ambient: [0.2, 0.2, 0.2, 1.0],
                    diffuse: [0.5, 0.5, 0.5, 1.0],
                    specular: [0.5, 0.5, 0.5, 1.0],
                    direction: [0.57735, -0.57735, 0.57735],
                },
                DirectionalLight {
                    ambient: [0.0, 0.0, 0.0, 1.0],
                    diffuse: [0.20, 0.20, 0.20, 1.0],
                    specular: [0.25, 0.25, 0.25, 1.0],
                    direction: [-0.57735, -0.57735, 0.57735],
                },
                DirectionalLight {
                    ambient: [0.0, 0.0, 0.0, 1.0],
                    diffuse: [0.2, 0.2, 0.2, 1.0],
                    specular: [0.0, 0.0, 0.0, 1.0],
                    direction: [0.0, -0.707, -0.707],
                },
            ],
        }
    }
}
