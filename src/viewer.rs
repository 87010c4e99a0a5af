//! Standalone picking window backed by winit.
//!
//! ```no_run
//! # use tripick::Viewer;
//! Viewer::builder()
//!     .with_path("assets/models/skull.txt")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{path::PathBuf, sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{error::TripickError, options::Options, Engine, InputEvent, MouseButton};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            path: None,
            options: None,
            title: "Tripick".into(),
        }
    }

    /// Set the model file, overriding `scene.model_path` in the options.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let mut options = self.options.unwrap_or_default();
        if let Some(path) = self.path {
            options.scene.model_path = Some(path);
        }
        Viewer {
            options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window that draws a scene and highlights the triangle under a
/// right-click.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`TripickError::Viewer`] if the event loop fails, or the
    /// error that prevented the engine from starting.
    pub fn run(self) -> Result<(), TripickError> {
        let event_loop =
            EventLoop::new().map_err(|e| TripickError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            last_frame_time: Instant::now(),
            options: Some(self.options),
            title: self.title,
            startup_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| TripickError::Viewer(e.to_string()))?;
        app.startup_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<Engine>,
    last_frame_time: Instant,
    options: Option<Options>,
    title: String,
    startup_error: Option<TripickError>,
}

impl ViewerApp {
    fn window_attributes(&self, event_loop: &ActiveEventLoop) -> winit::window::WindowAttributes {
        let attrs = Window::default_attributes().with_title(self.title.clone());
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        match monitor {
            Some(mon) => {
                let size = mon.size();
                let scale = mon.scale_factor();
                let logical_w = (f64::from(size.width) / scale * 0.75) as u32;
                let logical_h = (f64::from(size.height) / scale * 0.75) as u32;
                attrs.with_inner_size(winit::dpi::LogicalSize::new(logical_w, logical_h))
            }
            None => attrs,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        if let Some(engine) = &mut self.engine {
            engine.update(dt);
            match engine.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    engine.reconfigure_surface();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("surface out of memory, exiting");
                    event_loop.exit();
                    return;
                }
                Err(e) => {
                    log::warn!("render error: {e:?}");
                }
            }
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };

        let attrs = self.window_attributes(event_loop);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.startup_error = Some(TripickError::Viewer(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let engine = match pollster::block_on(Engine::new(
            window.clone(),
            (size.width, size.height),
            options,
        )) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("failed to start engine: {e}");
                self.startup_error = Some(e);
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        self.last_frame_time = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if matches!(event, WindowEvent::RedrawRequested) {
            self.redraw(event_loop);
            return;
        }

        let Some(engine) = &mut self.engine else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                engine.resize(size.width, size.height);
            }

            WindowEvent::Focused(false) => {
                engine.release_input();
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let _ = engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let _ = engine.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let _ = engine.handle_input(InputEvent::Key {
                    code: format!("{code:?}"),
                    pressed: event.state == ElementState::Pressed,
                });
            }

            _ => (),
        }
    }
}
