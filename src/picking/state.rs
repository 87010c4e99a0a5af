use std::fmt;

use glam::{Mat4, Vec3};

use crate::scene::Vertex;

/// A successful pick: the nearest triangle under the cursor across all
/// pickable objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index of the object in the scene.
    pub object: usize,
    /// Triangle index within the object's mesh.
    pub triangle: usize,
    /// Ray parameter in the object's local space.
    pub t: f32,
    /// Distance from the eye to the hit point in world units.
    pub world_distance: f32,
    /// Hit point in world space.
    pub world_point: Vec3,
    /// The triangle's vertices as stored in the mesh (local space).
    pub vertices: [Vertex; 3],
    /// World matrix of the object at pick time.
    pub world: Mat4,
}

impl PickHit {
    /// Triangle corners mapped into world space.
    #[must_use]
    pub fn world_positions(&self) -> [Vec3; 3] {
        self.vertices.map(|v| self.world.transform_point3(v.pos()))
    }
}

/// The single live pick result.
///
/// A hit overwrites the stored triangle wholesale; a miss only clears the
/// `picked` flag so the last triangle stays staged. Any scene mutation
/// after the pick also clears the flag, since the stored vertices and world
/// matrix no longer describe what is on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickState {
    picked: bool,
    last: Option<PickHit>,
    generation: u64,
    scene_generation: u64,
}

impl PickState {
    /// Nothing picked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a pick and return whether it hit.
    pub fn apply(&mut self, result: Option<PickHit>) -> bool {
        match result {
            Some(hit) => {
                self.last = Some(hit);
                self.picked = true;
                self.generation += 1;
            }
            None => self.picked = false,
        }
        self.picked
    }

    /// Record a pick whose vertices were uploaded for the highlight draw.
    ///
    /// A failed upload leaves the previous triangle in the GPU buffer, so the
    /// hit is dropped and treated as a miss.
    pub fn apply_staged<E: fmt::Display>(
        &mut self,
        result: Option<PickHit>,
        staged: Result<(), E>,
    ) -> bool {
        match staged {
            Ok(()) => self.apply(result),
            Err(e) => {
                log::error!("failed to stage highlight: {e}");
                self.apply(None)
            }
        }
    }

    /// Compare against the scene's mutation generation and hide the
    /// highlight if the scene changed since the last call. Returns `true`
    /// when the highlight was hidden.
    pub fn sync_scene(&mut self, scene_generation: u64) -> bool {
        let stale = self.picked && scene_generation != self.scene_generation;
        self.scene_generation = scene_generation;
        if stale {
            self.picked = false;
        }
        stale
    }

    /// Hide the highlight without forgetting the last hit.
    pub fn clear(&mut self) {
        self.picked = false;
    }

    /// Whether the highlight should be drawn.
    #[must_use]
    pub fn is_picked(&self) -> bool {
        self.picked
    }

    /// Most recent successful hit, even if `picked` has since been
    /// cleared.
    #[must_use]
    pub fn last(&self) -> Option<&PickHit> {
        self.last.as_ref()
    }

    /// Vertices staged for the highlight draw.
    #[must_use]
    pub fn highlight_vertices(&self) -> Option<[Vertex; 3]> {
        self.last.map(|hit| hit.vertices)
    }

    /// Incremented on every successful pick.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn hit(triangle: usize) -> PickHit {
        let v = |x: f32| Vertex::new(Vec3::new(x, 0.0, 0.0), -Vec3::Z, Vec2::ZERO);
        PickHit {
            object: 0,
            triangle,
            t: 1.0,
            world_distance: 1.0,
            world_point: Vec3::ZERO,
            vertices: [v(0.0), v(1.0), v(triangle as f32)],
            world: Mat4::from_translation(Vec3::Y),
        }
    }

    #[test]
    fn hit_overwrites_and_bumps_generation() {
        let mut state = PickState::new();
        assert!(state.apply(Some(hit(3))));
        assert!(state.apply(Some(hit(5))));
        assert!(state.is_picked());
        assert_eq!(state.last().unwrap().triangle, 5);
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn miss_keeps_vertices_and_clears_flag() {
        let mut state = PickState::new();
        let _ = state.apply(Some(hit(2)));
        let staged = state.highlight_vertices();

        assert!(!state.apply(None));
        assert!(!state.is_picked());
        assert_eq!(state.highlight_vertices(), staged);
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn clear_hides_without_forgetting() {
        let mut state = PickState::new();
        let _ = state.apply(Some(hit(1)));
        state.clear();
        assert!(!state.is_picked());
        assert_eq!(state.last().unwrap().triangle, 1);
    }

    #[test]
    fn failed_upload_keeps_previous_triangle() {
        let mut state = PickState::new();
        let _ = state.apply_staged(Some(hit(1)), Ok::<(), &str>(()));
        let staged = state.highlight_vertices();

        assert!(!state.apply_staged(Some(hit(4)), Err("buffer full")));
        assert!(!state.is_picked());
        assert_eq!(state.last().unwrap().triangle, 1);
        assert_eq!(state.highlight_vertices(), staged);
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn successful_upload_applies_hit() {
        let mut state = PickState::new();
        assert!(state.apply_staged(Some(hit(2)), Ok::<(), &str>(())));
        assert_eq!(state.last().unwrap().triangle, 2);
    }

    #[test]
    fn scene_change_hides_highlight() {
        let mut state = PickState::new();
        assert!(!state.sync_scene(3));
        let _ = state.apply(Some(hit(1)));

        assert!(!state.sync_scene(3));
        assert!(state.is_picked());

        assert!(state.sync_scene(4));
        assert!(!state.is_picked());
        assert_eq!(state.last().unwrap().triangle, 1);
        assert!(!state.sync_scene(5));
    }

    #[test]
    fn pick_after_scene_change_stays_visible() {
        let mut state = PickState::new();
        let _ = state.sync_scene(1);
        let _ = state.apply(Some(hit(1)));
        assert!(state.sync_scene(2));

        let _ = state.apply(Some(hit(2)));
        assert!(!state.sync_scene(2));
        assert!(state.is_picked());
    }

    #[test]
    fn world_positions_apply_world_matrix() {
        let [a, b, _] = hit(0).world_positions();
        assert_eq!(a, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(b, Vec3::new(1.0, 1.0, 0.0));
    }
}
