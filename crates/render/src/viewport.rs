/// Size of the drawable surface in physical pixels. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Match the displayed size. Returns true when the size actually changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let next = Self::new(width, height);
        if next == *self {
            return false;
        }
        tracing::debug!(
            from = ?(self.width, self.height),
            to = ?(next.width, next.height),
            "viewport resized"
        );
        *self = next;
        true
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sizes_clamp_to_one() {
        let viewport = Viewport::new(0, 0);
        assert_eq!(viewport.width(), 1);
        assert_eq!(viewport.height(), 1);
        assert_eq!(viewport.aspect_ratio(), 1.0);
    }

    #[test]
    fn resize_reports_changes_only() {
        let mut viewport = Viewport::new(1280, 720);
        assert!(!viewport.resize(1280, 720));
        assert!(viewport.resize(800, 600));
        assert_eq!(viewport.width(), 800);
        assert!(!viewport.resize(800, 600));
    }

    #[test]
    fn aspect_ratio() {
        let viewport = Viewport::new(1920, 1080);
        assert!((viewport.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
