//! Rendering Adapter: renderer-agnostic data for the tutorial shapes.
//!
//! Primitives, vertex attributes, draw calls, shader sources keyed by id and
//! viewport sizing live here so they can be checked without a GPU. The wgpu
//! backend consumes them unchanged.
//!
//! # Invariants
//! - Renderers never mutate the camera.
//! - A mesh is drawable only if all attributes share one vertex count.

mod error;
mod mesh;
mod primitives;
mod renderer;
mod shader;
mod viewport;

pub use error::RenderError;
pub use mesh::{DrawCall, MeshData, VertexAttribute};
pub use primitives::{COLOR, POSITION, Primitive, UnknownPrimitive};
pub use renderer::{DebugTextRenderer, FrameView, Renderer};
pub use shader::{AttributeSpec, ShaderLibrary, ShaderSource, ShaderStage};
pub use viewport::Viewport;

pub fn crate_info() -> &'static str {
    "walkthrough-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
