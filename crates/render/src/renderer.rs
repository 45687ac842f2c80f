use crate::primitives::Primitive;
use glam::{Mat4, Vec3};
use walkthrough_camera::Camera;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub aspect: f32,
    /// Projection * view, already computed for this frame's aspect ratio.
    pub view_projection: Mat4,
    pub model: Mat4,
    pub primitive: Primitive,
}

impl FrameView {
    /// Snapshot the camera after it has been advanced for this frame.
    pub fn new(camera: &Camera, aspect: f32, primitive: Primitive) -> Self {
        Self {
            eye: camera.eye(),
            look_at: camera.look_at(),
            aspect,
            view_projection: camera.view_projection(aspect),
            model: Mat4::IDENTITY,
            primitive,
        }
    }

    pub fn with_model(self, model: Mat4) -> Self {
        Self { model, ..self }
    }

    /// The matrix uploaded as the shader uniform.
    pub fn mvp(&self) -> Mat4 {
        self.view_projection * self.model
    }
}

/// Renderer-agnostic interface.
///
/// Renderers read a frame view and produce output. They never touch the
/// camera; the host owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameView) -> Self::Output;
}

/// Text dump of a frame, for the CLI and for tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame ({}, aspect={:.3}) ===\n",
            frame.primitive, frame.aspect
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) look_at=({:.2}, {:.2}, {:.2})\n",
            frame.eye.x, frame.eye.y, frame.eye.z, frame.look_at.x, frame.look_at.y, frame.look_at.z
        ));
        out.push_str("MVP (rows):\n");
        let mvp = frame.mvp();
        for row in 0..4 {
            let r = mvp.row(row);
            out.push_str(&format!(
                "  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]\n",
                r.x, r.y, r.z, r.w
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkthrough_input::Key;

    #[test]
    fn debug_renderer_default_camera() {
        let camera = Camera::default();
        let frame = FrameView::new(&camera, 1.5, Primitive::Triangle);
        let output = DebugTextRenderer::new().render(&frame);

        assert!(output.contains("triangle"));
        assert!(output.contains("eye=(0.00, 0.00, 20.00)"));
        assert_eq!(output.lines().filter(|l| l.trim_start().starts_with('[')).count(), 4);
    }

    #[test]
    fn debug_renderer_reflects_movement() {
        let mut camera = Camera::default();
        camera.on_key(Key::W, true);
        camera.advance(250.0);
        let frame = FrameView::new(&camera, 1.0, Primitive::Square);
        let output = DebugTextRenderer::new().render(&frame);
        assert!(output.contains("eye=(0.00, 0.00, 15.00)"));
    }

    #[test]
    fn mvp_applies_model() {
        let camera = Camera::default();
        let frame = FrameView::new(&camera, 1.0, Primitive::Tetrahedron);
        assert_eq!(frame.mvp(), frame.view_projection);

        let model = Mat4::from_rotation_y(0.5);
        let spun = frame.with_model(model);
        assert_eq!(spun.mvp(), frame.view_projection * model);
    }
}
