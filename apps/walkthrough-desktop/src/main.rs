use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Mat4;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};
use walkthrough_camera::{Camera, CameraConfig};
use walkthrough_input::Key;
use walkthrough_render::{FrameView, Primitive};
use walkthrough_render_wgpu::{GpuContext, WgpuRenderer};

#[derive(Parser)]
#[command(name = "walkthrough-desktop", about = "Walk around a tutorial primitive")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Camera config file (JSON); missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shape to draw
    #[arg(long, default_value = "tetrahedron")]
    primitive: Primitive,

    /// Model rotation about +Y in degrees per second
    #[arg(long, default_value = "0")]
    spin: f32,
}

/// Keys the camera listens to.
fn camera_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}

/// Application state.
struct AppState {
    camera: Camera,
    /// Camera keys whose press reached the camera and whose release has not.
    held: HashSet<Key>,
    primitive: Primitive,
    spin_degrees: f32,
    model_angle: f32,
    show_overlay: bool,
    last_frame: Instant,
    last_frame_ms: f32,
}

impl AppState {
    fn new(camera: Camera, primitive: Primitive, spin_degrees: f32) -> Self {
        Self {
            camera,
            held: HashSet::new(),
            primitive,
            spin_degrees,
            model_angle: 0.0,
            show_overlay: true,
            last_frame: Instant::now(),
            last_frame_ms: 0.0,
        }
    }

    fn update(&mut self, dt_ms: f32) {
        self.last_frame_ms = dt_ms;
        self.camera.advance(dt_ms);
        self.model_angle += self.spin_degrees.to_radians() * dt_ms / 1000.0;
    }

    fn frame(&self, aspect: f32) -> FrameView {
        FrameView::new(&self.camera, aspect, self.primitive)
            .with_model(Mat4::from_rotation_y(self.model_angle))
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) -> bool {
        // Auto-repeat would add the same key's contribution twice.
        if repeat {
            return false;
        }
        if let Some(key) = camera_key(code) {
            // Only balanced press/release pairs reach the accumulators.
            let changed = if pressed {
                self.held.insert(key)
            } else {
                self.held.remove(&key)
            };
            if changed {
                self.camera.on_key(key, pressed);
            }
            return false;
        }
        if !pressed {
            return false;
        }

        match code {
            KeyCode::KeyP => {
                self.primitive = self.primitive.next();
                tracing::info!("drawing {}", self.primitive);
            }
            KeyCode::F1 => {
                self.show_overlay = !self.show_overlay;
            }
            KeyCode::Escape => return true,
            _ => {}
        }
        false
    }

    /// Drop every held key; releases arriving afterwards are ignored.
    fn release_all(&mut self) {
        self.held.clear();
        self.camera.reset_input();
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        egui::SidePanel::left("overlay")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Walkthrough");
                ui.separator();

                let eye = self.camera.eye();
                let target = self.camera.look_at();
                let input = self.camera.input();
                ui.label(format!("Eye: ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z));
                ui.label(format!(
                    "Look-at: ({:.2}, {:.2}, {:.2})",
                    target.x, target.y, target.z
                ));
                ui.label(format!(
                    "Move input: ({:.0}, {:.0}, {:.0})",
                    input.movement().x,
                    input.movement().y,
                    input.movement().z
                ));
                ui.label(format!(
                    "Look input: ({:.0}, {:.0})",
                    input.look().x,
                    input.look().y
                ));
                ui.label(format!("Frame: {:.1} ms", self.last_frame_ms));
                ui.separator();

                ui.heading("Primitive");
                for primitive in Primitive::ALL {
                    ui.radio_value(&mut self.primitive, primitive, primitive.name());
                }
                ui.add(
                    egui::Slider::new(&mut self.spin_degrees, -180.0..=180.0).text("spin deg/s"),
                );

                ui.separator();
                ui.small("WASD: Move | Arrows: Look | P: Shape | F1: Overlay | Esc: Quit");
            });
    }
}

/// GPU resources, created once the window exists.
struct Gpu {
    ctx: GpuContext,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Walkthrough")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let ctx = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to acquire GPU context")?;
        let renderer = WgpuRenderer::new(&ctx).context("failed to build renderer")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&ctx.device, ctx.surface_format(), None, 1, false);

        self.window = Some(window);
        self.gpu = Some(Gpu {
            ctx,
            renderer,
            egui_winit,
            egui_renderer,
        });
        self.state.last_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt_ms = (now - self.state.last_frame).as_secs_f32().min(0.1) * 1000.0;
        self.state.last_frame = now;
        self.state.update(dt_ms);

        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        let output = match gpu.ctx.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.ctx.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = self.state.frame(gpu.ctx.aspect_ratio());
        gpu.renderer.render(&gpu.ctx, &view, &frame);

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.ctx.config.width, gpu.ctx.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let (device, queue) = (&gpu.ctx.device, &gpu.ctx.queue);
        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gpu.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            // Key releases always reach the camera so held intent never sticks.
            if response.consumed && !matches!(event, WindowEvent::KeyboardInput { .. }) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    if gpu.ctx.resize(new_size.width, new_size.height) {
                        let viewport = gpu.ctx.viewport();
                        gpu.renderer
                            .resize(&gpu.ctx.device, viewport.width(), viewport.height());
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.state.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed, repeat)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("walkthrough-desktop starting");

    let config = match &cli.config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("failed to load camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };
    let camera = Camera::new(config).context("invalid camera config")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(camera, cli.primitive, cli.spin));
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
