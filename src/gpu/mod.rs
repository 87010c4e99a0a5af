//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, dynamic buffer management,
//! depth attachments, uniform layouts, and shader composition.

/// Growable GPU buffers and scoped in-place writes.
pub mod dynamic_buffer;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth-stencil attachment.
pub mod texture;
/// Uniform buffer layouts.
pub mod uniforms;
