use glam::{Vec2, Vec3};

/// Interleaved mesh vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Local-space position.
    pub position: [f32; 3],
    /// Local-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Build a vertex from glam vectors.
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }

    /// Position as a glam vector.
    #[inline]
    #[must_use]
    pub fn pos(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Vertex buffer layout matching the `@location(0..3)` inputs of
    /// `mesh.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2
        ];
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}
