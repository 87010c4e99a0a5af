//! CPU triangle picking.
//!
//! A pick turns a pixel into a view-space ray, carries it into each
//! pickable object's local space, runs a nearest-hit scan over the
//! object's triangles and keeps the closest hit in world units.

mod intersect;
mod ray;
mod state;

use glam::Vec2;
pub use intersect::{
    intersect_triangle, nearest_hit, Intersector, MeshHit, TriangleHit,
    BARYCENTRIC_EPSILON, PARALLEL_EPSILON,
};
pub use ray::{checked_inverse, PickError, Ray};
pub use state::{PickHit, PickState};

use crate::camera::Camera;
use crate::options::PickingOptions;
use crate::scene::Scene;

/// Screen-space triangle picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Picker {
    intersector: Intersector,
    normalize_local_direction: bool,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(&PickingOptions::default())
    }
}

impl Picker {
    /// Picker configured from options.
    #[must_use]
    pub fn new(options: &PickingOptions) -> Self {
        Self {
            intersector: Intersector::new(options.barycentric_epsilon),
            normalize_local_direction: options.normalize_local_direction,
        }
    }

    /// Nearest triangle under pixel `screen` of a `viewport`-sized
    /// target, or `Ok(None)` when the ray misses every pickable object.
    ///
    /// Hits on different objects are compared by world-space distance
    /// from the eye; equal distances keep the lower object index.
    ///
    /// # Errors
    ///
    /// Returns a [`PickError`] when the screen point, viewport or camera
    /// projection is unusable, or when a view or world matrix is singular.
    pub fn pick(
        &self,
        screen: Vec2,
        viewport: (u32, u32),
        camera: &Camera,
        scene: &Scene,
    ) -> Result<Option<PickHit>, PickError> {
        let view_ray = Ray::from_screen(screen, viewport, &camera.proj())?;
        let inverse_view = checked_inverse(&camera.view())?;
        let eye = inverse_view.transform_point3(view_ray.origin);

        let mut best: Option<PickHit> = None;
        for (index, object) in scene.pickable() {
            let world = object.world_matrix();
            let inverse_world = checked_inverse(&world)?;
            let local = view_ray.to_local(
                &inverse_view,
                &inverse_world,
                self.normalize_local_direction,
            );

            let Some(hit) = object.mesh.raycast(&local, &self.intersector) else {
                continue;
            };
            let world_point = world.transform_point3(local.at(hit.t));
            let world_distance = world_point.distance(eye);
            if best.is_some_and(|b| world_distance >= b.world_distance) {
                continue;
            }
            let Some(vertices) = object.mesh.triangle(hit.triangle) else {
                continue;
            };

            log::debug!(
                "ray hit {} triangle {} at t = {} ({} world units)",
                object.name,
                hit.triangle,
                hit.t,
                world_distance
            );
            best = Some(PickHit {
                object: index,
                triangle: hit.triangle,
                t: hit.t,
                world_distance,
                world_point,
                vertices,
                world,
            });
        }
        Ok(best)
    }
}
