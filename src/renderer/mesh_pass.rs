//! Triangle-mesh draw passes: lit scene objects, planar shadows and the
//! pick highlight.
//!
//! All three passes share `mesh.wgsl` and the same bind group layouts;
//! they differ in depth/stencil and blend state and in the per-object
//! uniforms written by [`MeshRenderer::prepare`].

use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::error::TripickError;
use crate::gpu::dynamic_buffer::{BufferWriteError, DynamicBuffer};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, MESH_SHADER};
use crate::gpu::texture::DepthTexture;
use crate::gpu::uniforms::{FrameUniform, ObjectUniform};
use crate::options::Options;
use crate::picking::PickState;
use crate::renderer::pipeline_util;
use crate::scene::{shadow_matrix, MaterialPass, RenderObject, Scene, Vertex};

/// Lift applied to planar shadows so they do not z-fight the ground.
const SHADOW_OFFSET: f32 = 0.001;

/// Create a triangle-list pipeline over [`Vertex`] with back-face culling.
///
/// Front faces wind clockwise, matching the left-handed scene.
fn create_mesh_pipeline(
    context: &RenderContext,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    blend: Option<wgpu::BlendState>,
    depth_stencil: wgpu::DepthStencilState,
) -> wgpu::RenderPipeline {
    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &pipeline_util::color_targets(context.format(), blend),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}

/// Uniform buffer plus its bind group for one draw.
struct ObjectBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ObjectBinding {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&ObjectUniform::new(
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                Default::default(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, uniform: &ObjectUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

/// GPU copy of one scene object.
pub struct GpuMesh {
    name: String,
    vertices: DynamicBuffer,
    indices: Option<DynamicBuffer>,
    element_count: u32,
    casts_shadow: bool,
    lit: ObjectBinding,
    shadow: ObjectBinding,
}

impl GpuMesh {
    /// Upload an object's geometry and allocate its uniforms.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        object: &RenderObject,
    ) -> Self {
        let name = object.name.clone();
        Self {
            vertices: DynamicBuffer::new_with_data(
                device,
                &format!("{name} Vertices"),
                object.mesh.vertices(),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: object
                .mesh
                .indices()
                .map(|indices| Self::index_buffer(device, &name, indices)),
            element_count: object.mesh.element_count(),
            casts_shadow: object.shadow_material.is_some(),
            lit: ObjectBinding::new(device, layout, &format!("{name} Uniform")),
            shadow: ObjectBinding::new(device, layout, &format!("{name} Shadow Uniform")),
            name,
        }
    }

    fn index_buffer(device: &wgpu::Device, name: &str, indices: &[u32]) -> DynamicBuffer {
        DynamicBuffer::new_with_data(
            device,
            &format!("{name} Indices"),
            indices,
            wgpu::BufferUsages::INDEX,
        )
    }

    /// Rewrite geometry in place from `object`, growing buffers as needed.
    pub fn update(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, object: &RenderObject) {
        let _ = self.vertices.write(device, queue, object.mesh.vertices());
        match (object.mesh.indices(), &mut self.indices) {
            (Some(indices), Some(buffer)) => {
                let _ = buffer.write(device, queue, indices);
            }
            (Some(indices), None) => {
                self.indices = Some(Self::index_buffer(device, &self.name, indices));
            }
            (None, _) => self.indices = None,
        }
        self.element_count = object.mesh.element_count();
        self.casts_shadow = object.shadow_material.is_some();
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, binding: &ObjectBinding) {
        if self.element_count == 0 {
            return;
        }
        pass.set_bind_group(1, &binding.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        match self.indices {
            Some(ref indices) => {
                pass.set_index_buffer(indices.buffer().slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.element_count, 0, 0..1);
            }
            None => pass.draw(0..self.element_count, 0..1),
        }
    }
}

/// Draws the scene, its planar shadows and the picked triangle.
pub struct MeshRenderer {
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    lit_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    highlight_pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    synced_generation: Option<u64>,
    highlight_vertices: DynamicBuffer,
    highlight: ObjectBinding,
    highlight_visible: bool,
    depth: DepthTexture,
}

impl MeshRenderer {
    /// Compile the mesh shader and build all three pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`TripickError::Shader`] if the mesh shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, TripickError> {
        let device = &context.device;
        let shader = composer
            .compose(device, "Mesh Shader", MESH_SHADER, "mesh.wgsl")
            .map_err(|e| TripickError::Shader(e.to_string()))?;

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[pipeline_util::uniform_entry(0)],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[pipeline_util::uniform_entry(0)],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform"),
            size: size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let lit_pipeline = create_mesh_pipeline(
            context,
            "Lit Mesh",
            &shader,
            &layout,
            Some(wgpu::BlendState::REPLACE),
            pipeline_util::depth_stencil_state(wgpu::CompareFunction::Less),
        );
        let shadow_pipeline = create_mesh_pipeline(
            context,
            "Planar Shadow",
            &shader,
            &layout,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            pipeline_util::shadow_depth_stencil_state(),
        );
        // LessEqual so the highlight wins against the identical triangle
        // already in the depth buffer.
        let highlight_pipeline = create_mesh_pipeline(
            context,
            "Pick Highlight",
            &shader,
            &layout,
            Some(wgpu::BlendState::REPLACE),
            pipeline_util::depth_stencil_state(wgpu::CompareFunction::LessEqual),
        );

        let highlight_vertices = DynamicBuffer::new(
            device,
            "Highlight Vertices",
            3 * size_of::<Vertex>(),
            wgpu::BufferUsages::VERTEX,
        );
        let highlight = ObjectBinding::new(device, &object_layout, "Highlight Uniform");
        let (width, height) = context.size();

        Ok(Self {
            frame_buffer,
            frame_bind_group,
            object_layout,
            lit_pipeline,
            shadow_pipeline,
            highlight_pipeline,
            meshes: Vec::new(),
            synced_generation: None,
            highlight_vertices,
            highlight,
            highlight_visible: false,
            depth: DepthTexture::new(device, width, height),
        })
    }

    /// Recreate the depth attachment for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width, height) != self.depth.size() && width > 0 && height > 0 {
            self.depth = DepthTexture::new(device, width, height);
        }
    }

    /// Re-upload scene geometry if the scene changed since the last sync.
    ///
    /// Existing GPU meshes are rewritten in place; new objects get fresh
    /// buffers.
    pub fn sync_scene(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        if self.synced_generation == Some(scene.generation()) {
            return;
        }
        for (i, object) in scene.iter().enumerate() {
            match self.meshes.get_mut(i) {
                Some(gpu) => gpu.update(device, queue, object),
                None => self
                    .meshes
                    .push(GpuMesh::new(device, &self.object_layout, object)),
            }
        }
        self.meshes.truncate(scene.len());
        self.synced_generation = Some(scene.generation());
        log::debug!("synced {} meshes", self.meshes.len());
    }

    /// Stage the picked triangle's vertices for the highlight draw.
    ///
    /// # Errors
    ///
    /// Returns a [`BufferWriteError`] if the staging view cannot be
    /// acquired.
    pub fn upload_highlight(
        &mut self,
        queue: &wgpu::Queue,
        vertices: &[Vertex; 3],
    ) -> Result<(), BufferWriteError> {
        self.highlight_vertices
            .write_scoped(queue, vertices.len(), |staged: &mut [Vertex]| {
                staged.copy_from_slice(vertices);
                Ok(())
            })
    }

    /// Write per-frame and per-object uniforms.
    pub fn prepare(
        &mut self,
        queue: &wgpu::Queue,
        camera: &Camera,
        options: &Options,
        scene: &Scene,
        pick: &PickState,
    ) {
        let frame = FrameUniform::new(camera, &options.lighting);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let view_proj = camera.view_proj();
        let key_light = Vec3::from(options.lighting.lights[0].direction);
        let flatten = Mat4::from_translation(Vec3::Y * SHADOW_OFFSET)
            * shadow_matrix(Vec4::new(0.0, 1.0, 0.0, 0.0), key_light);

        for (gpu, object) in self.meshes.iter().zip(scene.iter()) {
            let world = object.world_matrix();
            gpu.lit.write(
                queue,
                &ObjectUniform::new(world, world, view_proj, object.material_for(MaterialPass::Lit)),
            );
            if gpu.casts_shadow {
                gpu.shadow.write(
                    queue,
                    &ObjectUniform::new(
                        flatten * world,
                        world,
                        view_proj,
                        object.material_for(MaterialPass::Shadow),
                    ),
                );
            }
        }

        self.highlight_visible = pick.is_picked() && !self.highlight_vertices.is_empty();
        if let Some(hit) = pick.last() {
            self.highlight.write(
                queue,
                &ObjectUniform::new(hit.world, hit.world, view_proj, options.picking.highlight),
            );
        }
    }

    /// Record the scene pass into `encoder`, drawing into `target`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear_color: [f32; 4],
        draw_shadows: bool,
    ) {
        let [r, g, b, a] = clear_color.map(f64::from);
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            ..Default::default()
        });
        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        pass.set_pipeline(&self.lit_pipeline);
        for mesh in &self.meshes {
            mesh.draw(&mut pass, &mesh.lit);
        }

        if draw_shadows {
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_stencil_reference(0);
            for mesh in self.meshes.iter().filter(|m| m.casts_shadow) {
                mesh.draw(&mut pass, &mesh.shadow);
            }
        }

        if self.highlight_visible {
            pass.set_pipeline(&self.highlight_pipeline);
            pass.set_bind_group(1, &self.highlight.bind_group, &[]);
            pass.set_vertex_buffer(0, self.highlight_vertices.buffer().slice(..));
            pass.draw(0..3, 0..1);
        }
    }
}
