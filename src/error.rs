//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::scene::MeshError;

/// Errors produced by the tripick crate.
#[derive(Debug)]
pub enum TripickError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to load or validate a mesh.
    MeshLoad(MeshError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// WGSL composition failure.
    Shader(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for TripickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::MeshLoad(e) => write!(f, "mesh load error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for TripickError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::MeshLoad(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for TripickError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<MeshError> for TripickError {
    fn from(e: MeshError) -> Self {
        Self::MeshLoad(e)
    }
}

impl From<std::io::Error> for TripickError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
