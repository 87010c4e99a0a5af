use std::fmt;

use glam::Vec3;

use super::vertex::Vertex;
use crate::picking::{Intersector, MeshHit, Ray};

/// Errors produced while building or loading a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An index refers past the end of the vertex list.
    IndexOutOfRange {
        /// Position of the offending entry in the index list.
        position: usize,
        /// The index value.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// Malformed text at the given 1-based line.
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// A declared count disagrees with the data that follows it.
    CountMismatch {
        /// Which section (`"vertex"` or `"triangle"`).
        what: &'static str,
        /// Count from the header.
        declared: usize,
        /// Count actually read.
        found: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange {
                position,
                index,
                vertex_count,
            } => write!(
                f,
                "index {index} at position {position} is out of range for \
                 {vertex_count} vertices"
            ),
            Self::Parse { line, message } => {
                write!(f, "line {line}: {message}")
            }
            Self::CountMismatch {
                what,
                declared,
                found,
            } => write!(f, "declared {declared} {what}s but found {found}"),
        }
    }
}

impl std::error::Error for MeshError {}

/// Triangle-list geometry, indexed or sequential.
///
/// Indexed meshes read triangles as triples of the index list;
/// non-indexed meshes read consecutive triples of vertices. A trailing
/// partial triple is ignored in both cases.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub(super) vertices: Vec<Vertex>,
    pub(super) indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Build a mesh, checking every index against the vertex count.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfRange`] for the first bad index.
    pub fn new(vertices: Vec<Vertex>, indices: Option<Vec<u32>>) -> Result<Self, MeshError> {
        if let Some(ref list) = indices {
            if let Some(position) =
                list.iter().position(|&i| i as usize >= vertices.len())
            {
                return Err(MeshError::IndexOutOfRange {
                    position,
                    index: list[position],
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, indices })
    }

    /// Sequential (non-indexed) mesh.
    #[must_use]
    pub fn sequential(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            indices: None,
        }
    }

    /// Vertex list.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index list, if the mesh is indexed.
    #[must_use]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Whether triangles are read through the index list.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of complete triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.vertices.len(), Vec::len)
            / 3
    }

    /// Number of elements a draw call covers (indices or vertices).
    #[must_use]
    pub fn element_count(&self) -> u32 {
        let count = self
            .indices
            .as_ref()
            .map_or(self.vertices.len(), Vec::len);
        (count - count % 3) as u32
    }

    fn corner(&self, triangle: usize, corner: usize) -> Option<&Vertex> {
        let slot = triangle * 3 + corner;
        match self.indices {
            Some(ref list) => list
                .get(slot)
                .and_then(|&i| self.vertices.get(i as usize)),
            None => self.vertices.get(slot),
        }
    }

    /// The three vertices of triangle `index`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<[Vertex; 3]> {
        if index >= self.triangle_count() {
            return None;
        }
        Some([
            *self.corner(index, 0)?,
            *self.corner(index, 1)?,
            *self.corner(index, 2)?,
        ])
    }

    /// Triangle positions in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).map(move |i| {
            self.triangle(i)
                .map_or([Vec3::ZERO; 3], |[a, b, c]| [a.pos(), b.pos(), c.pos()])
        })
    }

    /// Nearest triangle hit by a local-space ray.
    #[must_use]
    pub fn raycast(&self, ray: &Ray, intersector: &Intersector) -> Option<MeshHit> {
        intersector.nearest(ray, self.triangles())
    }

    /// Axis-aligned bounds of the vertex positions, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(Vertex::pos);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn v(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), -Vec3::Z, Vec2::new(x, y))
    }

    fn square() -> Vec<Vertex> {
        vec![v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)]
    }

    #[test]
    fn indexed_triangles_follow_index_list() {
        let mesh = Mesh::new(square(), Some(vec![0, 2, 1, 0, 3, 2])).unwrap();
        assert!(mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 2);
        let [a, b, c] = mesh.triangle(1).unwrap();
        assert_eq!(a, square()[0]);
        assert_eq!(b, square()[3]);
        assert_eq!(c, square()[2]);
        assert!(mesh.triangle(2).is_none());
    }

    #[test]
    fn sequential_triangles_follow_vertex_order() {
        let verts = square();
        let list = vec![verts[0], verts[1], verts[2], verts[0], verts[2], verts[3], verts[1]];
        let mesh = Mesh::sequential(list);
        assert!(!mesh.is_indexed());
        // Trailing vertex is not a triangle.
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.element_count(), 6);
        assert_eq!(mesh.triangle(1).unwrap()[2], verts[3]);
        assert_eq!(mesh.triangles().count(), 2);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = Mesh::new(square(), Some(vec![0, 1, 4])).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                position: 2,
                index: 4,
                vertex_count: 4
            }
        );
    }

    #[test]
    fn raycast_uses_index_order() {
        let mesh = Mesh::new(square(), Some(vec![0, 1, 2, 0, 2, 3])).unwrap();
        let ray = Ray::new(Vec3::new(0.25, 0.75, -1.0), Vec3::Z);
        let hit = mesh.raycast(&ray, &Intersector::default()).unwrap();
        assert_eq!(hit.triangle, 1);
        assert!((hit.t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = Mesh::sequential(square());
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::ZERO);
        assert_eq!(hi, Vec3::new(1.0, 1.0, 0.0));
        assert!(Mesh::default().bounds().is_none());
    }
}
