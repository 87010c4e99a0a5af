//! Scene rendering: lit meshes, planar shadows and the pick highlight.

pub mod mesh_pass;
pub(crate) mod pipeline_util;

pub use mesh_pass::{GpuMesh, MeshRenderer};
