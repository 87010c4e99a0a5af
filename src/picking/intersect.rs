//! Ray–triangle intersection and nearest-hit search.
//!
//! Möller–Trumbore with an inclusive barycentric tolerance so that a ray
//! aimed exactly at an edge shared by two triangles always lands in at
//! least one of them. The nearest-hit scan is linear; meshes here are
//! demo-sized and carry no acceleration structure.

use glam::Vec3;

use super::ray::Ray;

/// Tolerance on `u`, `v` and `u + v` at the triangle boundary.
pub const BARYCENTRIC_EPSILON: f32 = 1e-5;

/// Relative cut-off on the determinant. It is compared against
/// `|direction| * |edge1| * |edge2|`, its largest possible magnitude, so
/// the test is the sine of the ray/plane angle times the sine of the
/// corner angle: independent of triangle size and ray length. Below it
/// the ray is parallel to the plane or the triangle has no area.
pub const PARALLEL_EPSILON: f32 = 1e-8;

/// Where a ray crosses a single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter at the hit: `origin + t * direction`.
    pub t: f32,
    /// Barycentric weight of the second vertex.
    pub u: f32,
    /// Barycentric weight of the third vertex.
    pub v: f32,
}

impl TriangleHit {
    /// Barycentric weight of the first vertex (`1 - u - v`).
    #[inline]
    #[must_use]
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }
}

/// Nearest hit over a triangle list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    /// Index of the triangle in iteration order.
    pub triangle: usize,
    /// Ray parameter at the hit.
    pub t: f32,
    /// Barycentric weight of the second vertex.
    pub u: f32,
    /// Barycentric weight of the third vertex.
    pub v: f32,
}

/// Intersector with a configurable boundary tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersector {
    /// Tolerance applied to the barycentric bounds.
    pub barycentric_epsilon: f32,
}

impl Default for Intersector {
    fn default() -> Self {
        Self {
            barycentric_epsilon: BARYCENTRIC_EPSILON,
        }
    }
}

impl Intersector {
    /// Intersector with the given boundary tolerance. Negative or
    /// non-finite values fall back to [`BARYCENTRIC_EPSILON`].
    #[must_use]
    pub fn new(barycentric_epsilon: f32) -> Self {
        if barycentric_epsilon.is_finite() && barycentric_epsilon >= 0.0 {
            Self {
                barycentric_epsilon,
            }
        } else {
            Self::default()
        }
    }

    /// Test one triangle. Only hits strictly in front of the ray origin
    /// (`t > 0`) are reported.
    #[must_use]
    pub fn triangle(&self, ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<TriangleHit> {
        let eps = self.barycentric_epsilon;

        let edge1 = b - a;
        let edge2 = c - a;
        let p = ray.direction.cross(edge2);
        let det = edge1.dot(p);

        // A NaN determinant comes from a degenerate ray.
        let scale = ray.direction.length() * edge1.length() * edge2.length();
        if det.is_nan() || det.abs() <= PARALLEL_EPSILON * scale {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - a;
        let u = s.dot(p) * inv_det;
        if u < -eps || u > 1.0 + eps {
            return None;
        }

        let q = s.cross(edge1);
        let v = ray.direction.dot(q) * inv_det;
        if v < -eps || u + v > 1.0 + eps {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t > 0.0).then_some(TriangleHit { t, u, v })
    }

    /// Closest hit across `triangles`, in iteration order. Ties keep the
    /// earlier triangle.
    pub fn nearest<I>(&self, ray: &Ray, triangles: I) -> Option<MeshHit>
    where
        I: IntoIterator<Item = [Vec3; 3]>,
    {
        let mut best: Option<MeshHit> = None;
        for (index, tri) in triangles.into_iter().enumerate() {
            let Some(hit) = self.triangle(ray, tri) else {
                continue;
            };
            if best.is_none_or(|b| hit.t < b.t) {
                best = Some(MeshHit {
                    triangle: index,
                    t: hit.t,
                    u: hit.u,
                    v: hit.v,
                });
            }
        }
        best
    }
}

/// [`Intersector::triangle`] with the default tolerance.
#[must_use]
pub fn intersect_triangle(ray: &Ray, triangle: [Vec3; 3]) -> Option<TriangleHit> {
    Intersector::default().triangle(ray, triangle)
}

/// [`Intersector::nearest`] with the default tolerance.
pub fn nearest_hit<I>(ray: &Ray, triangles: I) -> Option<MeshHit>
where
    I: IntoIterator<Item = [Vec3; 3]>,
{
    Intersector::default().nearest(ray, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-4;

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray { origin, direction }
    }

    fn tri() -> [Vec3; 3] {
        [
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(3.0, 0.0, 5.0),
            Vec3::new(0.0, 3.0, 5.0),
        ]
    }

    #[test]
    fn centroid_hit_has_equal_weights() {
        let [a, b, c] = tri();
        let centroid = (a + b + c) / 3.0;
        let origin = Vec3::new(centroid.x, centroid.y, 0.0);
        let hit = intersect_triangle(&ray(origin, Vec3::Z), tri()).unwrap();

        assert!((hit.t - 5.0).abs() < TOL);
        assert!((hit.u - 1.0 / 3.0).abs() < TOL);
        assert!((hit.v - 1.0 / 3.0).abs() < TOL);
        assert!((hit.w() - 1.0 / 3.0).abs() < TOL);
    }

    #[test]
    fn t_scales_with_direction_length() {
        let origin = Vec3::new(0.5, 0.5, 0.0);
        let hit = intersect_triangle(&ray(origin, Vec3::Z * 2.0), tri()).unwrap();
        assert!((hit.t - 2.5).abs() < TOL);
    }

    #[test]
    fn oblique_ray_distance_matches_plane() {
        // Plane z = 5 seen from z = 1: 4 units straight ahead, 4 * sqrt(2)
        // along a unit direction at 45 degrees in the xz plane.
        let origin = Vec3::new(0.2, 0.5, 1.0);
        let hit = intersect_triangle(&ray(origin, Vec3::Z), tri()).unwrap();
        assert!((hit.t - 4.0).abs() < TOL);

        let origin = Vec3::new(-3.0, 0.5, 1.0);
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let hit = intersect_triangle(&ray(origin, dir), tri()).unwrap();
        assert!((hit.t - 4.0 * std::f32::consts::SQRT_2).abs() < TOL);
    }

    #[test]
    fn miss_outside_bounds() {
        let origin = Vec3::new(4.0, 4.0, 0.0);
        assert!(intersect_triangle(&ray(origin, Vec3::Z), tri()).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let origin = Vec3::new(0.5, 0.5, 5.0);
        assert!(intersect_triangle(&ray(origin, Vec3::X), tri()).is_none());
    }

    #[test]
    fn behind_origin_is_rejected() {
        // The infinite line crosses the triangle at z = 5, but the ray
        // starts past it and points away.
        let origin = Vec3::new(0.5, 0.5, 10.0);
        assert!(intersect_triangle(&ray(origin, Vec3::Z), tri()).is_none());
        assert!(intersect_triangle(&ray(origin, -Vec3::Z), tri()).is_some());
    }

    #[test]
    fn origin_on_plane_is_not_a_hit() {
        let origin = Vec3::new(0.5, 0.5, 5.0);
        assert!(intersect_triangle(&ray(origin, Vec3::Z), tri()).is_none());
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        let flat = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let origin = Vec3::new(0.5, 0.0, -1.0);
        assert!(intersect_triangle(&ray(origin, Vec3::Z), flat).is_none());
        assert!(nearest_hit(&ray(origin, Vec3::Z), [flat]).is_none());
    }

    #[test]
    fn tiny_triangle_is_hit_at_centroid() {
        let s = 1e-4_f32;
        let small = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(s, 0.0, 1.0),
            Vec3::new(0.0, s, 1.0),
        ];
        let origin = Vec3::new(s / 3.0, s / 3.0, 0.0);
        let hit = intersect_triangle(&ray(origin, Vec3::Z), small).unwrap();
        assert!((hit.t - 1.0).abs() < TOL);
        assert!((hit.u - 1.0 / 3.0).abs() < 1e-3);
        assert!((hit.v - 1.0 / 3.0).abs() < 1e-3);

        // Still found through a mesh scan, next to a large neighbour.
        let hit = nearest_hit(&ray(origin, Vec3::Z), [tri(), small]).unwrap();
        assert_eq!(hit.triangle, 1);
    }

    #[test]
    fn nearly_parallel_ray_on_tiny_triangle_misses() {
        let s = 1e-4_f32;
        let small = [Vec3::ZERO, Vec3::new(s, 0.0, 0.0), Vec3::new(0.0, s, 0.0)];
        // Grazes the plane at an angle far below the cut-off.
        let dir = Vec3::new(1.0, 0.0, 1e-12).normalize();
        let origin = Vec3::new(-1.0, s / 4.0, 0.0);
        assert!(intersect_triangle(&ray(origin, dir), small).is_none());
    }

    #[test]
    fn nan_direction_is_rejected() {
        let origin = Vec3::new(0.5, 0.5, 0.0);
        let dir = Vec3::new(f32::NAN, 0.0, 1.0);
        assert!(intersect_triangle(&ray(origin, dir), tri()).is_none());
    }

    #[test]
    fn empty_list_has_no_hit() {
        let empty: Vec<[Vec3; 3]> = Vec::new();
        assert!(nearest_hit(&ray(Vec3::ZERO, Vec3::Z), empty).is_none());
    }

    #[test]
    fn nearest_of_stacked_triangles() {
        let at = |z: f32| {
            [
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(0.0, 1.0, z),
            ]
        };
        let list = [at(9.0), at(3.0), at(6.0), at(-2.0)];
        let hit = nearest_hit(&ray(Vec3::ZERO, Vec3::Z), list).unwrap();
        assert_eq!(hit.triangle, 1);
        assert!((hit.t - 3.0).abs() < TOL);
    }

    #[test]
    fn ties_keep_first_triangle() {
        let [a, b, c] = tri();
        let list = [[a, b, c], [a, c, b], [a, b, c]];
        let hit = nearest_hit(&ray(Vec3::new(0.5, 0.5, 0.0), Vec3::Z), list).unwrap();
        assert_eq!(hit.triangle, 0);
    }

    #[test]
    fn shared_edge_hits_exactly_one() {
        // Unit square at z = 2 split along the diagonal (0,0)-(1,1).
        let p00 = Vec3::new(0.0, 0.0, 2.0);
        let p10 = Vec3::new(1.0, 0.0, 2.0);
        let p11 = Vec3::new(1.0, 1.0, 2.0);
        let p01 = Vec3::new(0.0, 1.0, 2.0);
        let list = [[p00, p10, p11], [p00, p11, p01]];

        for s in [0.1_f32, 0.25, 0.5, 0.75, 0.9] {
            let r = ray(Vec3::new(s, s, 0.0), Vec3::Z);
            let hits = list
                .iter()
                .filter(|t| intersect_triangle(&r, **t).is_some())
                .count();
            assert!(hits >= 1, "edge point {s} missed both triangles");

            let hit = nearest_hit(&r, list).unwrap();
            assert_eq!(hit.triangle, 0);
            assert!((hit.t - 2.0).abs() < TOL);
        }
    }

    #[test]
    fn zero_tolerance_still_accepts_vertices() {
        let strict = Intersector::new(0.0);
        let [a, _, _] = tri();
        let r = ray(Vec3::new(a.x, a.y, 0.0), Vec3::Z);
        assert!(strict.triangle(&r, tri()).is_some());
    }

    #[test]
    fn invalid_tolerance_falls_back_to_default() {
        assert_eq!(Intersector::new(-1.0), Intersector::default());
        assert_eq!(Intersector::new(f32::NAN), Intersector::default());
    }

    #[test]
    fn tolerance_widens_boundary() {
        // Just outside the hypotenuse u + v = 1.
        let origin = Vec3::new(1.5 + 3e-6, 1.5 + 3e-6, 0.0);
        let r = ray(origin, Vec3::Z);
        assert!(Intersector::new(0.0).triangle(&r, tri()).is_none());
        assert!(Intersector::default().triangle(&r, tri()).is_some());
    }
}
