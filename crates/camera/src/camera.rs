use crate::config::{CameraConfig, CameraError};
use glam::{Mat4, Vec3, Vec4};
use walkthrough_input::{InputState, Key};

/// Orthonormal camera frame derived from eye, look-at and up.
///
/// `back` points from the look-at point toward the eye, which is the third
/// row of the view rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub right: Vec3,
    pub up: Vec3,
    pub back: Vec3,
}

impl Basis {
    pub fn from_look_at(eye: Vec3, look_at: Vec3, up: Vec3) -> Self {
        // Coincident eye and target fall back to the identity rotation.
        let back = (eye - look_at).try_normalize().unwrap_or(Vec3::Z);
        let right = up.cross(back).normalize_or_zero();
        let up = back.cross(right);
        Self { right, up, back }
    }

    /// Convert input intent into a world-space direction.
    ///
    /// Forward and strafe ignore the vertical part of the basis so the
    /// camera walks instead of flying; input y is always world up.
    pub fn to_camera_space(&self, input: Vec3) -> Vec3 {
        let forward = Vec3::new(self.back.x, 0.0, self.back.z);
        let right = Vec3::new(self.right.x, 0.0, self.right.z);
        Vec3::Y * input.y + forward * -input.z + right * input.x
    }

    /// Right-handed view matrix placing the camera at `eye`.
    pub fn view_matrix(&self, eye: Vec3) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(self.right.x, self.up.x, self.back.x, 0.0),
            Vec4::new(self.right.y, self.up.y, self.back.y, 0.0),
            Vec4::new(self.right.z, self.up.z, self.back.z, 0.0),
            Vec4::new(
                -self.right.dot(eye),
                -self.up.dot(eye),
                -self.back.dot(eye),
                1.0,
            ),
        )
    }
}

/// First-person look-at camera driven by held keys.
///
/// The host forwards key events through [`Camera::on_key`] or
/// [`Camera::on_key_change`], calls [`Camera::advance`] once per frame, then
/// uploads [`Camera::view_projection`].
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    eye: Vec3,
    look_at: Vec3,
    up: Vec3,
    input: InputState,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        config.validate()?;
        tracing::info!(
            eye = ?config.eye,
            look_at = ?config.look_at,
            speed = config.movement_speed,
            "camera created"
        );
        Ok(Self::from_config(config))
    }

    /// Start at the config's initial pose with no keys held. Callers validate.
    fn from_config(config: CameraConfig) -> Self {
        Self {
            eye: config.eye,
            look_at: config.look_at,
            up: config.up.normalize(),
            config,
            input: InputState::new(),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Normalized up vector.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn basis(&self) -> Basis {
        Basis::from_look_at(self.eye, self.look_at, self.up)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.basis().view_matrix(self.eye)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        // A collapsed viewport reports 0 or NaN; draw square until it recovers.
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh(self.config.fov_y, aspect, self.config.near, self.config.far)
    }

    /// Projection * view for the current state. Recomputed on every call.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Column-major floats ready for a uniform upload.
    pub fn view_projection_cols(&self, aspect: f32) -> [f32; 16] {
        self.view_projection(aspect).to_cols_array()
    }

    /// Integrate held input over `delta_ms` milliseconds.
    ///
    /// Both the look-at point and the eye move along the basis computed at
    /// the start of the call, then get clamped to their limits. Non-positive
    /// or non-finite deltas leave the camera untouched.
    pub fn advance(&mut self, delta_ms: f32) {
        if !(delta_ms.is_finite() && delta_ms > 0.0) || self.input.is_idle() {
            return;
        }

        let basis = self.basis();
        let step = delta_ms * self.config.movement_speed;

        let look_delta = basis.to_camera_space(self.input.look()) * step;
        self.look_at = constrain(self.look_at + look_delta, self.config.look_at_limit);

        let eye_delta = basis.to_camera_space(self.input.movement()) * step;
        self.eye = constrain(self.eye + eye_delta, self.config.eye_limit);

        tracing::trace!(
            delta_ms,
            eye = ?self.eye,
            look_at = ?self.look_at,
            "camera advanced"
        );
    }

    pub fn on_key(&mut self, key: Key, pressed: bool) {
        self.input.apply(key, pressed);
    }

    /// Apply a legacy numeric key code. Codes outside the binding table are ignored.
    pub fn on_key_change(&mut self, key_code: u32, pressed: bool) {
        match Key::from_key_code(key_code) {
            Some(key) => self.on_key(key, pressed),
            None => tracing::trace!(key_code, "ignoring unbound key"),
        }
    }

    /// Forget held keys, e.g. when the window loses focus mid-press.
    pub fn reset_input(&mut self) {
        self.input.reset();
    }
}

/// Clamp each axis of `v` to [-limit, limit].
pub fn constrain(v: Vec3, limit: Vec3) -> Vec3 {
    v.min(limit).max(-limit)
}

/// Fixed-camera model-view-projection: eye at (0, 0, 7.5) looking at the origin.
pub fn simple_mvp(aspect: f32, model: Mat4) -> Mat4 {
    let eye = Vec3::new(0.0, 0.0, 7.5);
    let camera = Camera::from_config(CameraConfig {
        eye,
        look_at: Vec3::ZERO,
        up: Vec3::Y,
        ..CameraConfig::default()
    });
    camera.view_projection(aspect) * model
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn press(camera: &mut Camera, keys: &[Key]) {
        for key in keys {
            camera.on_key(*key, true);
        }
    }

    #[test]
    fn default_camera_matches_initial_state() {
        let cam = Camera::default();
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(cam.look_at(), Vec3::ZERO);
        assert_eq!(cam.up(), Vec3::Y);
        assert!(cam.input().is_idle());
    }

    #[test]
    fn default_camera_equals_validated_default_config() {
        let built = Camera::new(CameraConfig::default()).unwrap();
        let default = Camera::default();
        assert_eq!(default.config(), built.config());
        assert_eq!(default.eye(), built.eye());
        assert_eq!(default.look_at(), built.look_at());
        assert_eq!(default.up(), built.up());
    }

    #[test]
    fn up_vector_is_normalized() {
        let cam = Camera::new(CameraConfig {
            up: Vec3::new(0.0, 3.0, 0.0),
            ..CameraConfig::default()
        })
        .unwrap();
        assert!((cam.up().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Camera::new(CameraConfig {
            far: 0.05,
            ..CameraConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn view_matrix_matches_glam_look_at() {
        let cam = Camera::new(CameraConfig {
            eye: Vec3::new(3.0, 0.0, 12.0),
            look_at: Vec3::new(1.0, 2.0, 0.0),
            ..CameraConfig::default()
        })
        .unwrap();
        let expected = Mat4::look_at_rh(cam.eye(), cam.look_at(), Vec3::Y);
        assert!(cam.view_matrix().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn view_projection_is_projection_times_view() {
        let cam = Camera::default();
        let aspect = 16.0 / 9.0;
        let expected = Mat4::perspective_rh(0.785398, aspect, 0.1, 1000.0)
            * Mat4::look_at_rh(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y);
        assert!(cam.view_projection(aspect).abs_diff_eq(expected, EPS));
    }

    #[test]
    fn view_projection_is_deterministic() {
        let cam = Camera::default();
        assert_eq!(cam.view_projection(1.5), cam.view_projection(1.5));
        assert_eq!(cam.view_projection_cols(1.5), cam.view_projection_cols(1.5));
    }

    #[test]
    fn view_projection_tracks_aspect_changes() {
        let cam = Camera::default();
        assert_ne!(cam.view_projection(1.0), cam.view_projection(2.0));
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        let cam = Camera::default();
        assert_eq!(cam.view_projection(0.0), cam.view_projection(1.0));
        assert_eq!(cam.view_projection(f32::NAN), cam.view_projection(1.0));
    }

    #[test]
    fn cols_are_column_major() {
        let cam = Camera::default();
        let m = cam.view_projection(1.0);
        let cols = cam.view_projection_cols(1.0);
        assert_eq!(cols[12], m.w_axis.x);
        assert_eq!(cols[1], m.x_axis.y);
    }

    #[test]
    fn advance_zero_is_noop() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::W, Key::D, Key::Up, Key::Right]);
        cam.advance(0.0);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(cam.look_at(), Vec3::ZERO);
    }

    #[test]
    fn advance_without_input_is_noop() {
        let mut cam = Camera::default();
        cam.advance(1000.0);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, 20.0));
    }

    #[test]
    fn negative_and_nan_deltas_are_ignored() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::W]);
        cam.advance(-16.0);
        cam.advance(f32::NAN);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, 20.0));
    }

    #[test]
    fn forward_one_second_covers_twenty_units() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::W]);
        cam.advance(1000.0);
        assert!(cam.eye().abs_diff_eq(Vec3::ZERO, EPS));
        assert!(cam.eye().z >= -20.0 && cam.eye().z <= 20.0);
    }

    #[test]
    fn backward_moves_away_from_target() {
        let mut cam = Camera::new(CameraConfig {
            eye: Vec3::new(0.0, 0.0, 10.0),
            ..CameraConfig::default()
        })
        .unwrap();
        press(&mut cam, &[Key::S]);
        cam.advance(100.0);
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 12.0), EPS));
    }

    #[test]
    fn strafe_moves_along_camera_right() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::D]);
        cam.advance(100.0);
        assert!(cam.eye().abs_diff_eq(Vec3::new(2.0, 0.0, 20.0), EPS));

        cam.on_key(Key::D, false);
        press(&mut cam, &[Key::A]);
        cam.advance(200.0);
        assert!(cam.eye().x < 0.0);
    }

    #[test]
    fn split_advance_matches_single_advance() {
        let mut once = Camera::default();
        let mut twice = Camera::default();
        press(&mut once, &[Key::W]);
        press(&mut twice, &[Key::W]);

        once.advance(500.0);
        twice.advance(250.0);
        twice.advance(250.0);

        assert!(once.eye().abs_diff_eq(twice.eye(), EPS));
        assert!(once.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), EPS));
    }

    #[test]
    fn split_advance_is_approximate_when_basis_turns() {
        let mut once = Camera::default();
        let mut twice = Camera::default();
        press(&mut once, &[Key::Right]);
        press(&mut twice, &[Key::Right]);

        once.advance(100.0);
        twice.advance(50.0);
        twice.advance(50.0);

        // The second half step pans along a basis already turned toward +x.
        assert!((once.look_at().x - 2.0).abs() < EPS);
        assert!(twice.look_at().x < once.look_at().x);
        assert!(once.look_at().abs_diff_eq(twice.look_at(), 0.01));
    }

    #[test]
    fn look_input_pans_target_within_limits() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::Right, Key::Up]);
        cam.advance(50.0);
        assert!(cam.look_at().abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), EPS));

        cam.advance(10_000.0);
        assert!(cam.look_at().abs_diff_eq(Vec3::new(4.0, 4.0, 0.0), EPS));
    }

    #[test]
    fn vertical_eye_position_is_frozen() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::W, Key::D]);
        for _ in 0..100 {
            cam.advance(16.0);
        }
        assert_eq!(cam.eye().y, 0.0);
    }

    #[test]
    fn positions_never_leave_their_limits() {
        let mut cam = Camera::default();
        let mut seed = 0x9e37_79b9_u32;
        for _ in 0..400 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let key = Key::ALL[(seed % 8) as usize];
            cam.on_key(key, seed & 0x200 != 0);
            cam.advance((seed % 64) as f32);

            let eye = cam.eye();
            let target = cam.look_at();
            assert!(eye.x.abs() <= 20.0 && eye.z.abs() <= 20.0);
            assert!(target.x.abs() <= 4.0 && target.y.abs() <= 4.0);
            assert_eq!(target.z, 0.0);
        }
    }

    #[test]
    fn key_codes_drive_input() {
        let mut cam = Camera::default();
        cam.on_key_change(87, true);
        assert_eq!(cam.input().movement().z, 1.0);
        cam.on_key_change(37, true);
        assert_eq!(cam.input().look().x, -1.0);
        cam.on_key_change(87, false);
        assert_eq!(cam.input().movement().z, 0.0);
    }

    #[test]
    fn unknown_key_codes_are_ignored() {
        let mut cam = Camera::default();
        cam.on_key_change(32, true);
        cam.on_key_change(1000, false);
        assert!(cam.input().is_idle());
    }

    #[test]
    fn reset_input_stops_motion() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::W]);
        cam.reset_input();
        cam.advance(1000.0);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, 20.0));
    }

    #[test]
    fn coincident_eye_and_target_stay_finite() {
        let mut cam = Camera::default();
        press(&mut cam, &[Key::W]);
        cam.advance(1000.0);
        assert!(cam.view_projection(1.0).is_finite());

        cam.advance(16.0);
        assert!(cam.eye().is_finite());
    }

    #[test]
    fn basis_converts_input_to_world_directions() {
        let basis = Basis::from_look_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y);
        assert!(basis.to_camera_space(Vec3::Z).abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(basis.to_camera_space(Vec3::X).abs_diff_eq(Vec3::X, EPS));
        assert!(basis.to_camera_space(Vec3::Y).abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn forward_ignores_pitch() {
        let basis = Basis::from_look_at(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO, Vec3::Y);
        let dir = basis.to_camera_space(Vec3::Z);
        assert_eq!(dir.y, 0.0);
        assert!(dir.z < 0.0);
    }

    #[test]
    fn constrain_clamps_each_axis() {
        let v = constrain(Vec3::new(25.0, 3.0, -30.0), Vec3::new(20.0, 0.0, 20.0));
        assert_eq!(v, Vec3::new(20.0, 0.0, -20.0));
    }

    #[test]
    fn simple_mvp_uses_fixed_camera() {
        let model = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let expected = Mat4::perspective_rh(0.785398, 2.0, 0.1, 1000.0)
            * Mat4::look_at_rh(Vec3::new(0.0, 0.0, 7.5), Vec3::ZERO, Vec3::Y)
            * model;
        assert!(simple_mvp(2.0, model).abs_diff_eq(expected, EPS));
    }
}
