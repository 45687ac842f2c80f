use walkthrough_render::{AttributeSpec, COLOR, POSITION, ShaderLibrary, ShaderStage};

pub const COLORED_VERTEX_ID: &str = "colored.vert";
pub const COLORED_FRAGMENT_ID: &str = "colored.frag";

/// Inputs of the colored program, one vertex buffer per attribute.
pub const COLORED_ATTRIBUTES: [AttributeSpec; 2] = [
    AttributeSpec {
        name: POSITION,
        location: 0,
        dimension: 3,
    },
    AttributeSpec {
        name: COLOR,
        location: 1,
        dimension: 4,
    },
];

/// Transforms positions by the MVP uniform and passes color through.
pub const COLORED_VERTEX_SHADER: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.mvp * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}
"#;

pub const COLORED_FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

/// Library preloaded with the colored program's sources.
pub fn builtin_library() -> ShaderLibrary {
    let mut library = ShaderLibrary::new();
    library.insert(COLORED_VERTEX_ID, ShaderStage::Vertex, COLORED_VERTEX_SHADER);
    library.insert(COLORED_FRAGMENT_ID, ShaderStage::Fragment, COLORED_FRAGMENT_SHADER);
    library
}
