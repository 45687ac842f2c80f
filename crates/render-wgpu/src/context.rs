use walkthrough_render::{RenderError, Viewport};

/// Background color every frame is cleared to.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.180,
    g: 0.545,
    b: 0.341,
    a: 1.0,
};

/// Log a setup failure before handing it back to the host.
pub(crate) fn fail(err: RenderError) -> RenderError {
    tracing::error!("{err}");
    err
}

/// Surface, device and queue for one window.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    viewport: Viewport,
    backend: wgpu::Backend,
}

impl GpuContext {
    /// Acquire a GPU context for `target` (usually an `Arc<Window>`).
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| fail(RenderError::CreateSurface(e.to_string())))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| fail(RenderError::NoAdapter))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("walkthrough_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| fail(RenderError::RequestDevice(e.to_string())))?;

        device.on_uncaptured_error(Box::new(|e| {
            tracing::error!("uncaptured GPU error: {e}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| fail(RenderError::UnsupportedSurface))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let viewport = Viewport::new(width, height);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width(),
            height: viewport.height(),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let backend = adapter.get_info().backend;
        tracing::info!(
            "GPU initialized with {} backend, surface {:?} {}x{}",
            backend.to_str(),
            surface_format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            viewport,
            backend,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn backend(&self) -> wgpu::Backend {
        self.backend
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.viewport.aspect_ratio()
    }

    /// Match the surface to the window size. Returns true when it changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.viewport.resize(width, height) {
            return false;
        }
        self.config.width = self.viewport.width();
        self.config.height = self.viewport.height();
        self.surface.configure(&self.device, &self.config);
        true
    }

    /// Re-apply the current configuration after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}
