//! Reader for the plain-text model format used by the demo assets.
//!
//! ```text
//! VertexCount: 4
//! TriangleCount: 2
//! VertexList (pos, normal)
//! {
//!     -1 -1 0  0 0 -1
//!     ...
//! }
//! TriangleList
//! {
//!     0 1 2
//!     ...
//! }
//! ```
//!
//! Texture coordinates are not stored in the format and load as zero.

use std::path::Path;

use glam::{Vec2, Vec3};

use super::mesh::{Mesh, MeshError};
use super::vertex::Vertex;
use crate::error::TripickError;

/// Read and parse a model file.
///
/// # Errors
///
/// Returns [`TripickError::Io`] if the file cannot be read and
/// [`TripickError::MeshLoad`] if its contents are malformed.
pub fn load_mesh(path: &Path) -> Result<Mesh, TripickError> {
    let text = std::fs::read_to_string(path)?;
    let mesh = parse_mesh(&text)?;
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Line cursor that skips blank lines and remembers line numbers.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            line: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> MeshError {
        MeshError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn next_non_blank(&mut self) -> Result<&'a str, MeshError> {
        for (i, raw) in self.inner.by_ref() {
            self.line = i + 1;
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed);
            }
        }
        Err(self.error("unexpected end of file"))
    }

    fn expect(&mut self, token: &str) -> Result<(), MeshError> {
        let line = self.next_non_blank()?;
        if line == token {
            Ok(())
        } else {
            Err(self.error(format!("expected `{token}`, found `{line}`")))
        }
    }

    /// `Key: value` header line.
    fn count(&mut self, key: &str) -> Result<usize, MeshError> {
        let line = self.next_non_blank()?;
        let value = line
            .strip_prefix(key)
            .and_then(|rest| rest.trim_start().strip_prefix(':'))
            .ok_or_else(|| self.error(format!("expected `{key}:`")))?;
        value
            .trim()
            .parse()
            .map_err(|_| self.error(format!("invalid {key} `{}`", value.trim())))
    }

    /// Section header (anything starting with `name`) followed by `{`.
    fn open_section(&mut self, name: &str) -> Result<(), MeshError> {
        let line = self.next_non_blank()?;
        if !line.starts_with(name) {
            return Err(self.error(format!("expected `{name}`, found `{line}`")));
        }
        self.expect("{")
    }

    /// Rows until the closing `}`.
    fn rows<T>(
        &mut self,
        mut parse_row: impl FnMut(&str) -> Option<T>,
        what: &str,
    ) -> Result<Vec<T>, MeshError> {
        let mut out = Vec::new();
        loop {
            let line = self.next_non_blank()?;
            if line == "}" {
                return Ok(out);
            }
            let row = parse_row(line).ok_or_else(|| self.error(format!("malformed {what} `{line}`")))?;
            out.push(row);
        }
    }
}

fn floats<const N: usize>(line: &str) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    let mut parts = line.split_whitespace();
    for slot in &mut out {
        *slot = parts.next()?.parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}

fn triangle(line: &str) -> Option<[u32; 3]> {
    let mut out = [0; 3];
    let mut parts = line.split_whitespace();
    for slot in &mut out {
        *slot = parts.next()?.parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}

/// Parse model text into an indexed mesh.
///
/// # Errors
///
/// Returns [`MeshError::Parse`] with the offending line for malformed
/// text, [`MeshError::CountMismatch`] when the header counts disagree with
/// the data and [`MeshError::IndexOutOfRange`] for bad indices.
pub fn parse_mesh(text: &str) -> Result<Mesh, MeshError> {
    let mut lines = Lines::new(text);

    let vertex_count = lines.count("VertexCount")?;
    let triangle_count = lines.count("TriangleCount")?;

    lines.open_section("VertexList")?;
    let vertices = lines.rows(
        |line| {
            floats::<6>(line).map(|[px, py, pz, nx, ny, nz]| {
                Vertex::new(Vec3::new(px, py, pz), Vec3::new(nx, ny, nz), Vec2::ZERO)
            })
        },
        "vertex",
    )?;
    if vertices.len() != vertex_count {
        return Err(MeshError::CountMismatch {
            what: "vertex",
            declared: vertex_count,
            found: vertices.len(),
        });
    }

    lines.open_section("TriangleList")?;
    let triangles = lines.rows(triangle, "triangle")?;
    if triangles.len() != triangle_count {
        return Err(MeshError::CountMismatch {
            what: "triangle",
            declared: triangle_count,
            found: triangles.len(),
        });
    }

    let indices = triangles.into_iter().flatten().collect();
    Mesh::new(vertices, Some(indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "VertexCount: 4
TriangleCount: 2
VertexList (pos, normal)
{
\t-1.0 -1.0 0.0 0.0 0.0 -1.0
\t-1.0  1.0 0.0 0.0 0.0 -1.0
\t 1.0  1.0 0.0 0.0 0.0 -1.0
\t 1.0 -1.0 0.0 0.0 0.0 -1.0
}

TriangleList
{
\t0 1 2
\t0 2 3
}
";

    #[test]
    fn parses_indexed_quad() {
        let mesh = parse_mesh(QUAD).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices(), Some(&[0, 1, 2, 0, 2, 3][..]));
        let [a, _, c] = mesh.triangle(1).unwrap();
        assert_eq!(a.position, [-1.0, -1.0, 0.0]);
        assert_eq!(c.position, [1.0, -1.0, 0.0]);
        assert_eq!(c.normal, [0.0, 0.0, -1.0]);
        assert_eq!(c.tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn reports_line_of_bad_vertex() {
        let text = QUAD.replace("\t 1.0  1.0 0.0 0.0 0.0 -1.0", "\t1.0 oops 0 0 0 1");
        let err = parse_mesh(&text).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 7, .. }), "{err}");
    }

    #[test]
    fn rejects_count_mismatch() {
        let text = QUAD.replace("TriangleCount: 2", "TriangleCount: 3");
        assert_eq!(
            parse_mesh(&text).unwrap_err(),
            MeshError::CountMismatch {
                what: "triangle",
                declared: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        let text = QUAD.replace("\t0 2 3", "\t0 2 9");
        assert!(matches!(
            parse_mesh(&text).unwrap_err(),
            MeshError::IndexOutOfRange { index: 9, .. }
        ));
    }

    #[test]
    fn rejects_truncated_file() {
        let text = &QUAD[..QUAD.find("TriangleList").unwrap()];
        assert!(matches!(parse_mesh(text).unwrap_err(), MeshError::Parse { .. }));
    }

    #[test]
    fn rejects_missing_header() {
        let err = parse_mesh("TriangleCount: 2\n").unwrap_err();
        assert_eq!(
            err,
            MeshError::Parse {
                line: 1,
                message: "expected `VertexCount:`".into()
            }
        );
    }

    #[test]
    fn bundled_model_faces_outward() {
        let mesh = parse_mesh(include_str!("../../assets/models/gem.txt")).unwrap();
        assert_eq!(mesh.triangle_count(), 8);
        for i in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(i).unwrap().map(|v| v.pos());
            let face = (b - a).cross(c - a);
            assert!(face.dot(Vec3::from(mesh.vertices()[3 * i].normal)) > 0.0);
            assert!(face.dot(a + b + c) > 0.0, "triangle {i} winds inward");
        }
    }

    #[test]
    fn preset_points_at_bundled_model() {
        let options: crate::Options =
            toml::from_str(include_str!("../../assets/presets/inspect.toml")).unwrap();
        let path = options.scene.model_path.unwrap();
        assert!(path.ends_with("gem.txt"));
        assert!(options.scene.draw_shadows);
    }
}
