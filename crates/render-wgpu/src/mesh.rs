use crate::context::fail;
use walkthrough_render::{AttributeSpec, DrawCall, MeshData, RenderError};
use wgpu::util::DeviceExt;

/// Pick each program attribute out of `mesh`, in program order.
///
/// Every program attribute must be present with a matching dimension, and
/// the mesh may not carry attributes the program does not read.
pub fn bind_attributes<'a>(
    program: &[AttributeSpec],
    mesh: &'a MeshData,
) -> Result<Vec<&'a [f32]>, RenderError> {
    mesh.validate()?;

    if let Some(extra) = mesh
        .attributes
        .iter()
        .find(|a| !program.iter().any(|spec| spec.name == a.name))
    {
        return Err(RenderError::UnknownAttribute(extra.name.clone()));
    }

    program
        .iter()
        .map(|spec| {
            let attribute = mesh
                .attribute(spec.name)
                .ok_or_else(|| RenderError::MissingAttribute(spec.name.to_string()))?;
            if attribute.dimension != spec.dimension {
                return Err(RenderError::AttributeDimension {
                    name: spec.name.to_string(),
                    expected: spec.dimension,
                    actual: attribute.dimension,
                });
            }
            Ok(attribute.data.as_slice())
        })
        .collect()
}

/// GPU-resident buffers for one mesh, laid out for a specific program.
pub struct GpuMesh {
    vertex_buffers: Vec<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    draw_call: DrawCall,
}

impl GpuMesh {
    pub fn upload(
        device: &wgpu::Device,
        program: &[AttributeSpec],
        mesh: &MeshData,
    ) -> Result<Self, RenderError> {
        let streams = bind_attributes(program, mesh).map_err(fail)?;

        let vertex_buffers = program
            .iter()
            .zip(streams)
            .map(|(spec, data)| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(spec.name),
                    contents: bytemuck::cast_slice(data),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
            .collect();

        let index_buffer = mesh.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("index_buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        Ok(Self {
            vertex_buffers,
            index_buffer,
            draw_call: mesh.draw_call(),
        })
    }

    pub fn vertex_buffers(&self) -> &[wgpu::Buffer] {
        &self.vertex_buffers
    }

    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.index_buffer.as_ref()
    }

    pub fn draw_call(&self) -> DrawCall {
        self.draw_call
    }
}
