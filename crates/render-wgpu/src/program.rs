use crate::context::{GpuContext, fail};
use crate::mesh::GpuMesh;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use walkthrough_render::{AttributeSpec, DrawCall, RenderError, ShaderLibrary, ShaderStage};
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    mvp: [[f32; 4]; 4],
}

/// Vertex format for a float attribute of `dimension` components.
pub fn vertex_format(dimension: u32) -> Option<wgpu::VertexFormat> {
    match dimension {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

/// Compile one shader source from the library, surfacing validation errors.
pub fn compile_shader(
    device: &wgpu::Device,
    library: &ShaderLibrary,
    id: &str,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule, RenderError> {
    let source = library.get_stage(id, stage).map_err(fail)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(id),
        source: wgpu::ShaderSource::Wgsl(source.code.as_str().into()),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(fail(RenderError::ShaderCompile {
            id: id.to_string(),
            message: err.to_string(),
        }));
    }

    tracing::debug!(%id, %stage, "compiled shader");
    Ok(module)
}

/// A linked vertex + fragment pair with its MVP uniform.
pub struct Program {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    attributes: Vec<AttributeSpec>,
}

impl Program {
    /// Compile both stages and link them into a render pipeline.
    ///
    /// Each attribute reads from its own vertex buffer, in the order given.
    pub fn link(
        ctx: &GpuContext,
        library: &ShaderLibrary,
        vertex_id: &str,
        fragment_id: &str,
        attributes: &[AttributeSpec],
        topology: wgpu::PrimitiveTopology,
    ) -> Result<Self, RenderError> {
        let device = &ctx.device;
        let vertex_shader = compile_shader(device, library, vertex_id, ShaderStage::Vertex)?;
        let fragment_shader =
            compile_shader(device, library, fragment_id, ShaderStage::Fragment)?;

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mvp_uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                mvp: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mvp_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mvp_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("program_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_attributes = attributes
            .iter()
            .map(|spec| {
                let format = vertex_format(spec.dimension).ok_or_else(|| {
                    fail(RenderError::InvalidAttribute {
                        name: spec.name.to_string(),
                        reason: format!("unsupported dimension {}", spec.dimension),
                    })
                })?;
                Ok([wgpu::VertexAttribute {
                    format,
                    offset: 0,
                    shader_location: spec.location,
                }])
            })
            .collect::<Result<Vec<_>, RenderError>>()?;
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = vertex_attributes
            .iter()
            .map(|attribute| wgpu::VertexBufferLayout {
                array_stride: attribute[0].format.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attribute,
            })
            .collect();

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("program_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                // Flat shapes stay visible after walking past them.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(fail(RenderError::ProgramLink(err.to_string())));
        }

        tracing::info!(vertex_id, fragment_id, "linked program");
        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            attributes: attributes.to_vec(),
        })
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn set_mvp(&self, queue: &wgpu::Queue, mvp: Mat4) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                mvp: mvp.to_cols_array_2d(),
            }),
        );
    }

    /// Bind the program and the mesh's buffers, then issue its draw call.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        for (slot, buffer) in mesh.vertex_buffers().iter().enumerate() {
            pass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }
        match mesh.draw_call() {
            DrawCall::Arrays { first, count } => {
                pass.draw(first..first + count, 0..1);
            }
            DrawCall::Indexed { count } => {
                if let Some(index_buffer) = mesh.index_buffer() {
                    pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..count, 0, 0..1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_formats_by_dimension() {
        assert_eq!(vertex_format(1), Some(wgpu::VertexFormat::Float32));
        assert_eq!(vertex_format(3), Some(wgpu::VertexFormat::Float32x3));
        assert_eq!(vertex_format(4), Some(wgpu::VertexFormat::Float32x4));
        assert_eq!(vertex_format(0), None);
        assert_eq!(vertex_format(5), None);
    }

    #[test]
    fn vertex_format_size_is_four_bytes_per_component() {
        for dimension in 1..=4 {
            assert_eq!(vertex_format(dimension).unwrap().size(), 4 * dimension as u64);
        }
    }

    #[test]
    fn uniform_is_sixteen_floats() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 64);
    }
}
