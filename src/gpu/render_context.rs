use std::fmt;

/// Which step of bringing up the window's GPU context failed.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window handle could not back a surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the window.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused to open a device.
    Device(wgpu::RequestDeviceError),
    /// The adapter has no presentable configuration at this size.
    NoSurfaceConfig {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot create window surface: {e}"),
            Self::Adapter(e) => write!(f, "no adapter for window surface: {e}"),
            Self::Device(e) => write!(f, "cannot open GPU device: {e}"),
            Self::NoSurfaceConfig { width, height } => {
                write!(f, "no surface configuration for {width}x{height}")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::NoSurfaceConfig { .. } => None,
        }
    }
}

/// Window sizes reported before the first layout can be zero; a surface
/// cannot be configured at zero pixels.
fn surface_extent((width, height): (u32, u32)) -> (u32, u32) {
    (width.max(1), height.max(1))
}

/// Device, queue and window surface shared by the renderer and picker.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Submission queue.
    pub queue: wgpu::Queue,
    /// Presentation surface of the window.
    pub surface: wgpu::Surface<'static>,
    /// Active surface configuration.
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Open a device that can present to `window` and configure its
    /// surface with vsync at `size`.
    ///
    /// # Errors
    ///
    /// Returns the [`RenderContextError`] of the first step that failed.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::Surface)?;
        let adapter = Self::adapter_for(&instance, &surface).await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Tripick Device"),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::Device)?;

        let (width, height) = surface_extent(size);
        let config = wgpu::SurfaceConfiguration {
            present_mode: wgpu::PresentMode::Fifo,
            ..surface
                .get_default_config(&adapter, width, height)
                .ok_or(RenderContextError::NoSurfaceConfig { width, height })?
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    async fn adapter_for(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Result<wgpu::Adapter, RenderContextError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(RenderContextError::Adapter)?;
        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);
        Ok(adapter)
    }

    /// Color format of the surface.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Surface size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Apply a new window size. Zero or unchanged sizes are ignored; returns
    /// whether the surface was reconfigured.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return false;
        }
        (self.config.width, self.config.height) = (width, height);
        self.reconfigure();
        true
    }

    /// Configure the surface again, e.g. after it was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Next swapchain texture.
    ///
    /// # Errors
    ///
    /// Passes through the [`wgpu::SurfaceError`] from the surface.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Encoder for one frame's passes.
    #[must_use]
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            })
    }

    /// Finish `encoder` and queue it.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit([encoder.finish()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_extent_is_clamped() {
        assert_eq!(surface_extent((0, 0)), (1, 1));
        assert_eq!(surface_extent((640, 0)), (640, 1));
        assert_eq!(surface_extent((800, 600)), (800, 600));
    }

    #[test]
    fn missing_surface_config_names_size() {
        let err = RenderContextError::NoSurfaceConfig {
            width: 1,
            height: 1,
        };
        assert!(std::error::Error::source(&err).is_none());
        assert_eq!(err.to_string(), "no surface configuration for 1x1");
    }
}
