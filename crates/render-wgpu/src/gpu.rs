use crate::context::{CLEAR_COLOR, GpuContext};
use crate::mesh::GpuMesh;
use crate::program::{DEPTH_FORMAT, Program};
use crate::shaders::{self, COLORED_ATTRIBUTES, COLORED_FRAGMENT_ID, COLORED_VERTEX_ID};
use walkthrough_render::{FrameView, Primitive, RenderError, ShaderLibrary};

/// Draws one tutorial primitive per frame with the colored program.
pub struct WgpuRenderer {
    program: Program,
    meshes: Vec<(Primitive, GpuMesh)>,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    /// Link the builtin colored program and upload every primitive.
    pub fn new(ctx: &GpuContext) -> Result<Self, RenderError> {
        Self::with_library(ctx, &shaders::builtin_library())
    }

    /// Like [`WgpuRenderer::new`] with caller-provided shader sources under
    /// the builtin ids.
    pub fn with_library(ctx: &GpuContext, library: &ShaderLibrary) -> Result<Self, RenderError> {
        let program = Program::link(
            ctx,
            library,
            COLORED_VERTEX_ID,
            COLORED_FRAGMENT_ID,
            &COLORED_ATTRIBUTES,
            wgpu::PrimitiveTopology::TriangleList,
        )?;

        let meshes = Primitive::ALL
            .into_iter()
            .map(|primitive| {
                let mesh = GpuMesh::upload(&ctx.device, program.attributes(), &primitive.mesh())?;
                Ok((primitive, mesh))
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let viewport = ctx.viewport();
        let depth_texture =
            Self::create_depth_texture(&ctx.device, viewport.width(), viewport.height());

        Ok(Self {
            program,
            meshes,
            depth_texture,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Clear the target and draw the frame's primitive.
    pub fn render(&self, ctx: &GpuContext, view: &wgpu::TextureView, frame: &FrameView) {
        self.program.set_mvp(&ctx.queue, frame.mvp());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some((_, mesh)) = self.meshes.iter().find(|(p, _)| *p == frame.primitive) {
                self.program.draw(&mut pass, mesh);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
