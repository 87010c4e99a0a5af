//! The interactive engine: owns the GPU context, scene, camera, input
//! state and pick state, and turns input events into picks and frames.

use glam::Vec2;

use crate::camera::{Camera, CameraController};
use crate::error::TripickError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::input::{Command, InputEvent, InputProcessor};
use crate::options::Options;
use crate::picking::{PickState, Picker};
use crate::renderer::MeshRenderer;
use crate::scene::Scene;

/// Scene viewer with CPU triangle picking.
pub struct Engine {
    context: RenderContext,
    renderer: MeshRenderer,
    camera_controller: CameraController,
    input: InputProcessor,
    picker: Picker,
    pick_state: PickState,
    scene: Scene,
    options: Options,
}

impl Engine {
    /// Create the GPU context for `window` and build the scene described
    /// by `options`.
    ///
    /// # Errors
    ///
    /// Returns a [`TripickError`] if the model cannot be loaded, the GPU
    /// context cannot be created or the shaders fail to compose.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, TripickError> {
        let scene = Scene::from_options(&options.scene)?;
        let context = RenderContext::new(window, size).await?;
        Self::new_from_context(context, scene, options)
    }

    /// Build an engine around an existing context and scene.
    ///
    /// # Errors
    ///
    /// Returns [`TripickError::Shader`] if the shaders fail to compose.
    pub fn new_from_context(
        context: RenderContext,
        scene: Scene,
        options: Options,
    ) -> Result<Self, TripickError> {
        let mut composer =
            ShaderComposer::new().map_err(|e| TripickError::Shader(e.to_string()))?;
        let mut renderer = MeshRenderer::new(&context, &mut composer)?;
        renderer.sync_scene(&context.device, &context.queue, &scene);

        let (width, height) = context.size();
        let camera_controller =
            CameraController::new(&options.camera, width as f32 / height.max(1) as f32);
        log::info!(
            "engine ready: {} objects, {}x{} surface",
            scene.len(),
            width,
            height
        );

        Ok(Self {
            context,
            renderer,
            camera_controller,
            input: InputProcessor::with_key_bindings(options.keybindings.clone()),
            picker: Picker::new(&options.picking),
            pick_state: PickState::new(),
            scene,
            options,
        })
    }

    /// Resize the surface, depth attachment and camera projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.context.resize(width, height) {
            self.renderer.resize(&self.context.device, width, height);
            self.camera_controller.resize(width, height);
        }
    }

    /// Feed one input event through the processor and execute the command
    /// it produces, if any. Returns whether a command ran.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match self.input.handle_event(event) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Perform a command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::RotateCamera { delta } => self.camera_controller.rotate(delta),
            Command::Pick { x, y } => {
                let _ = self.pick(x, y);
            }
            Command::ClearPick => self.pick_state.clear(),
            Command::ResetCamera => self.camera_controller.reset(),
        }
    }

    /// Pick the triangle under pixel `(x, y)` and stage it for
    /// highlighting. Returns whether something was picked.
    ///
    /// A rejected request (see [`PickError`](crate::picking::PickError))
    /// is logged and leaves the pick state untouched.
    pub fn pick(&mut self, x: f32, y: f32) -> bool {
        let result = self.picker.pick(
            Vec2::new(x, y),
            self.context.size(),
            &self.camera_controller.camera,
            &self.scene,
        );
        let hit = match result {
            Ok(hit) => hit,
            Err(e) => {
                log::warn!("pick at ({x}, {y}) rejected: {e}");
                return false;
            }
        };

        let staged = match &hit {
            Some(hit) => {
                log::info!(
                    "picked triangle {} of object {} at distance {:.3}",
                    hit.triangle,
                    hit.object,
                    hit.world_distance
                );
                self.renderer
                    .upload_highlight(&self.context.queue, &hit.vertices)
            }
            None => Ok(()),
        };
        let _ = self.pick_state.sync_scene(self.scene.generation());
        self.pick_state.apply_staged(hit, staged)
    }

    /// Advance held-key camera movement by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.camera_controller.update(dt, self.input.movement());
    }

    /// Draw one frame and present it.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.pick_state.sync_scene(self.scene.generation()) {
            log::debug!("scene changed, pick highlight hidden");
        }
        self.renderer
            .sync_scene(&self.context.device, &self.context.queue, &self.scene);
        self.renderer.prepare(
            &self.context.queue,
            &self.camera_controller.camera,
            &self.options,
            &self.scene,
            &self.pick_state,
        );

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        self.renderer.render(
            &mut encoder,
            &view,
            self.options.scene.clear_color,
            self.options.scene.draw_shadows,
        );
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }

    /// Reapply the surface configuration after it was lost or outdated.
    pub fn reconfigure_surface(&self) {
        self.context.reconfigure();
    }

    /// Forget held keys and buttons, e.g. on focus loss.
    pub fn release_input(&mut self) {
        self.input.release_all();
    }

    /// Replace the options. Picking, lighting, materials and key bindings
    /// apply immediately; the camera restarts from the new camera options.
    /// The scene is not reloaded.
    pub fn set_options(&mut self, options: Options) {
        self.picker = Picker::new(&options.picking);
        self.input = InputProcessor::with_key_bindings(options.keybindings.clone());
        let (width, height) = self.context.size();
        self.camera_controller =
            CameraController::new(&options.camera, width as f32 / height.max(1) as f32);
        self.options = options;
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The scene being drawn.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access; changes are re-uploaded on the next frame.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The active camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera_controller.camera
    }

    /// The live pick result.
    #[must_use]
    pub fn pick_state(&self) -> &PickState {
        &self.pick_state
    }
}
