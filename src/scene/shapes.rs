//! Procedural meshes for the default scene, tests and benches.

use glam::{Vec2, Vec3};

use super::mesh::Mesh;
use super::vertex::Vertex;

/// Indexed `width` × `height` quad centred on the origin in the `z = 0`
/// plane, facing −Z (towards a camera placed at negative Z).
///
/// Triangle 0 is the lower-right half, triangle 1 the upper-left half,
/// split along the diagonal from (−w/2, −h/2) to (+w/2, +h/2).
#[must_use]
pub fn quad(width: f32, height: f32) -> Mesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let n = -Vec3::Z;
    let vertices = vec![
        Vertex::new(Vec3::new(-hw, -hh, 0.0), n, Vec2::new(0.0, 1.0)),
        Vertex::new(Vec3::new(-hw, hh, 0.0), n, Vec2::new(0.0, 0.0)),
        Vertex::new(Vec3::new(hw, hh, 0.0), n, Vec2::new(1.0, 0.0)),
        Vertex::new(Vec3::new(hw, -hh, 0.0), n, Vec2::new(1.0, 1.0)),
    ];
    Mesh {
        vertices,
        indices: Some(vec![0, 2, 3, 0, 1, 2]),
    }
}

/// Same quad as [`quad`], expanded into a sequential vertex list.
#[must_use]
pub fn unindexed_quad(width: f32, height: f32) -> Mesh {
    let indexed = quad(width, height);
    let vertices = (0..indexed.triangle_count())
        .filter_map(|i| indexed.triangle(i))
        .flatten()
        .collect();
    Mesh::sequential(vertices)
}

/// Axis-aligned box centred on the origin: 24 vertices (flat normals per
/// face), 12 triangles wound clockwise seen from outside.
#[must_use]
pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let h = Vec3::new(width, height, depth) * 0.5;
    // (normal, tangent u, tangent v) per face with u × v = −normal, so
    // the (0,1,2) (0,2,3) winding is clockwise from outside.
    let faces = [
        (-Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::Z, -Vec3::X, Vec3::Y),
        (-Vec3::X, -Vec3::Z, Vec3::Y),
        (Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (-Vec3::Y, Vec3::X, -Vec3::Z),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        let center = normal * h;
        let du = u * h;
        let dv = v * h;
        for (su, sv, tex) in [
            (-1.0, -1.0, Vec2::new(0.0, 1.0)),
            (-1.0, 1.0, Vec2::new(0.0, 0.0)),
            (1.0, 1.0, Vec2::new(1.0, 0.0)),
            (1.0, -1.0, Vec2::new(1.0, 1.0)),
        ] {
            vertices.push(Vertex::new(center + du * su + dv * sv, normal, tex));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh {
        vertices,
        indices: Some(indices),
    }
}

/// Flat `width` × `depth` grid in the `y = 0` plane facing +Y, with
/// `m` × `n` vertices (at least 2 × 2).
#[must_use]
pub fn grid(width: f32, depth: f32, m: u32, n: u32) -> Mesh {
    let (m, n) = (m.max(2), n.max(2));
    let (hw, hd) = (width * 0.5, depth * 0.5);
    let dx = width / (n - 1) as f32;
    let dz = depth / (m - 1) as f32;

    let mut vertices = Vec::with_capacity((m * n) as usize);
    for i in 0..m {
        let z = hd - i as f32 * dz;
        for j in 0..n {
            let x = -hw + j as f32 * dx;
            vertices.push(Vertex::new(
                Vec3::new(x, 0.0, z),
                Vec3::Y,
                Vec2::new(j as f32 / (n - 1) as f32, i as f32 / (m - 1) as f32),
            ));
        }
    }

    let mut indices = Vec::with_capacity(((m - 1) * (n - 1) * 6) as usize);
    for i in 0..m - 1 {
        for j in 0..n - 1 {
            let k = i * n + j;
            indices.extend_from_slice(&[k, k + 1, k + n, k + n, k + 1, k + n + 1]);
        }
    }

    Mesh {
        vertices,
        indices: Some(indices),
    }
}
