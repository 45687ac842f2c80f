//! wgpu render backend for the walkthrough tutorial.
//!
//! Acquires a GPU context for a window, compiles shaders from a
//! [`walkthrough_render::ShaderLibrary`], links them into a program, uploads
//! the tutorial primitives and draws one per frame.
//!
//! # Invariants
//! - Every setup failure is logged and returned as a `RenderError`; nothing
//!   is retried.
//! - Renderer never mutates the camera.

mod context;
mod gpu;
mod mesh;
mod program;
mod shaders;

pub use context::{CLEAR_COLOR, GpuContext};
pub use gpu::WgpuRenderer;
pub use mesh::{GpuMesh, bind_attributes};
pub use program::{DEPTH_FORMAT, Program, compile_shader, vertex_format};
pub use shaders::{
    COLORED_ATTRIBUTES, COLORED_FRAGMENT_ID, COLORED_FRAGMENT_SHADER, COLORED_VERTEX_ID,
    COLORED_VERTEX_SHADER, builtin_library,
};
