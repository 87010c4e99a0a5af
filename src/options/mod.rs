//! Centralized viewer options with TOML preset support.
//!
//! Camera, lighting, picking, scene and key-binding settings live here.
//! Options serialize to/from TOML so a preset file can override any
//! subset of them.

mod camera;
mod lighting;
mod picking;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use lighting::{DirectionalLight, LightingOptions};
pub use picking::PickingOptions;
pub use scene::SceneOptions;
use serde::{Deserialize, Serialize};

use crate::error::TripickError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[picking]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Directional lights.
    pub lighting: LightingOptions,
    /// Picking parameters.
    pub picking: PickingOptions,
    /// Model, placement and materials.
    pub scene: SceneOptions,
    /// Keyboard binding options.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TripickError::Io`] if the file cannot be read and
    /// [`TripickError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, TripickError> {
        let content = std::fs::read_to_string(path).map_err(TripickError::Io)?;
        toml::from_str(&content)
            .map_err(|e| TripickError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`TripickError::OptionsParse`] if serialization fails and
    /// [`TripickError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TripickError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TripickError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TripickError::Io)?;
        }
        std::fs::write(path, content).map_err(TripickError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Command;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[picking]
normalize_local_direction = false
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert!(!opts.picking.normalize_local_direction);
        // Everything else should be default
        assert_eq!(opts.picking.barycentric_epsilon, 1e-5);
        assert_eq!(opts.camera.fovy, 45.0);
        assert_eq!(opts.scene.translation, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn nested_material_override() {
        let toml_str = r"
[scene]
model_path = 'assets/models/car.txt'

[scene.material]
diffuse = [1.0, 0.0, 0.0, 1.0]
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(
            opts.scene.model_path.as_deref(),
            Some(Path::new("assets/models/car.txt"))
        );
        assert_eq!(opts.scene.material.diffuse, [1.0, 0.0, 0.0, 1.0]);
        // Unset material fields keep their defaults.
        assert_eq!(opts.scene.material.ambient, [0.4, 0.4, 0.4, 1.0]);
    }

    #[test]
    fn default_lights_match_three_light_rig() {
        let opts = Options::default();
        assert_eq!(opts.lighting.lights[0].direction, [0.57735, -0.57735, 0.57735]);
        assert_eq!(opts.lighting.lights[2].specular, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("Escape"), Some(Command::ClearPick));
        assert_eq!(opts.keybindings.lookup("KeyR"), Some(Command::ResetCamera));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("tripick-opts-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.scene.draw_shadows = true;
        opts.save(&path).unwrap();

        assert_eq!(Options::load(&path).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), vec!["preset".to_owned()]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let err = toml::from_str::<Options>("[camera]\nfovy = 'wide'\n")
            .map_err(|e| TripickError::OptionsParse(e.to_string()))
            .unwrap_err();
        assert!(matches!(err, TripickError::OptionsParse(_)));
    }
}
