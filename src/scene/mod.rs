//! Scene data: vertices, meshes, placed objects and the flat object list
//! the renderer draws and the picker walks.

mod loader;
mod mesh;
mod object;
pub mod shapes;
mod vertex;

use glam::Vec3;
pub use loader::{load_mesh, parse_mesh};
pub use mesh::{Mesh, MeshError};
pub use object::{shadow_matrix, Material, MaterialPass, RenderObject, Transform};
pub use vertex::Vertex;

use crate::error::TripickError;
use crate::options::SceneOptions;

/// Name given to the main model object.
pub const MODEL_OBJECT: &str = "model";
/// Name given to the optional ground grid.
pub const GROUND_OBJECT: &str = "ground";

/// Flat list of render objects.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<RenderObject>,
    /// Bumped on every mutation so GPU copies know when to rebuild.
    generation: u64,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the scene described by `options`: the configured model (or a
    /// box when none is set) plus an optional ground grid.
    ///
    /// # Errors
    ///
    /// Propagates model loading failures.
    pub fn from_options(options: &SceneOptions) -> Result<Self, TripickError> {
        let mesh = match options.model_path {
            Some(ref path) => load_mesh(path)?,
            None => {
                log::info!("no model configured, using a box");
                shapes::cuboid(4.0, 2.0, 8.0)
            }
        };

        let mut model = RenderObject::new(MODEL_OBJECT, mesh);
        let _ = model
            .translate(Vec3::from(options.translation))
            .scale(Vec3::from(options.scale));
        model.material = options.material;
        model.shadow_material = Some(options.shadow_material);

        let mut scene = Self::new();
        let _ = scene.add(model);

        if options.ground {
            let mut ground = RenderObject::new(
                GROUND_OBJECT,
                shapes::grid(options.ground_size, options.ground_size, 2, 2),
            );
            ground.material = options.ground_material;
            let _ = scene.add(ground);
        }
        Ok(scene)
    }

    /// Append an object, returning its index.
    pub fn add(&mut self, object: RenderObject) -> usize {
        self.objects.push(object);
        self.generation += 1;
        self.objects.len() - 1
    }

    /// Object by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RenderObject> {
        self.objects.get(index)
    }

    /// Mutable object by index. Counts as a mutation.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut RenderObject> {
        self.generation += 1;
        self.objects.get_mut(index)
    }

    /// Index of the first object with `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }

    /// All objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderObject> {
        self.objects.iter()
    }

    /// Pickable objects with their indices.
    pub fn pickable(&self) -> impl Iterator<Item = (usize, &RenderObject)> {
        self.objects.iter().enumerate().filter(|(_, o)| o.pickable)
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Current mutation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_build_box_and_ground() {
        let scene = Scene::from_options(&SceneOptions::default()).unwrap();
        assert_eq!(scene.len(), 2);

        let model = scene.get(scene.find(MODEL_OBJECT).unwrap()).unwrap();
        assert_eq!(model.mesh.triangle_count(), 12);
        assert_eq!(model.transform.translation, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(model.transform.scale, Vec3::splat(0.5));
        assert!(model.shadow_material.is_some());

        assert!(scene.find(GROUND_OBJECT).is_some());
    }

    #[test]
    fn ground_is_optional() {
        let options = SceneOptions {
            ground: false,
            ..SceneOptions::default()
        };
        let scene = Scene::from_options(&options).unwrap();
        assert_eq!(scene.len(), 1);
        assert!(scene.find(GROUND_OBJECT).is_none());
    }

    #[test]
    fn missing_model_file_is_io_error() {
        let options = SceneOptions {
            model_path: Some("does/not/exist.txt".into()),
            ..SceneOptions::default()
        };
        assert!(matches!(
            Scene::from_options(&options),
            Err(TripickError::Io(_))
        ));
    }

    #[test]
    fn mutation_bumps_generation() {
        let mut scene = Scene::new();
        let g0 = scene.generation();
        let idx = scene.add(RenderObject::new("a", shapes::quad(1.0, 1.0)));
        assert!(scene.generation() > g0);

        let g1 = scene.generation();
        if let Some(obj) = scene.get_mut(idx) {
            obj.pickable = false;
        }
        assert!(scene.generation() > g1);
        assert_eq!(scene.pickable().count(), 0);
    }
}
