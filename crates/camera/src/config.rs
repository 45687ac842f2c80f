use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

/// Errors from building a camera out of a configuration.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("near plane must be positive and finite, got {0}")]
    InvalidNear(f32),
    #[error("far plane ({far}) must be finite and greater than near plane ({near})")]
    InvalidFar { near: f32, far: f32 },
    #[error("vertical field of view must lie in (0, pi) radians, got {0}")]
    InvalidFov(f32),
    #[error("up vector must be finite and non-zero, got {0}")]
    InvalidUp(Vec3),
    #[error("movement speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),
    #[error("{name} limit must be finite and non-negative, got {limit}")]
    InvalidLimit { name: &'static str, limit: Vec3 },
    #[error("initial {name} {position} lies outside its limit +/-{limit}")]
    OutOfBounds {
        name: &'static str,
        position: Vec3,
        limit: Vec3,
    },
}

/// Camera parameters. Missing fields in a config file take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// World units per millisecond at full input.
    pub movement_speed: f32,
    /// Eye is clamped per axis to [-eye_limit, eye_limit].
    pub eye_limit: Vec3,
    /// Look-at point is clamped per axis to [-look_at_limit, look_at_limit].
    pub look_at_limit: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 20.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 0.785398,
            near: 0.1,
            far: 1000.0,
            movement_speed: 0.02,
            eye_limit: Vec3::new(20.0, 0.0, 20.0),
            look_at_limit: Vec3::new(4.0, 4.0, 0.0),
        }
    }
}

impl CameraConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CameraError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!("loaded camera config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if !(self.near.is_finite() && self.near > 0.0) {
            return Err(CameraError::InvalidNear(self.near));
        }
        if !(self.far.is_finite() && self.far > self.near) {
            return Err(CameraError::InvalidFar {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.fov_y > 0.0 && self.fov_y < PI) {
            return Err(CameraError::InvalidFov(self.fov_y));
        }
        if !self.up.is_finite() || self.up.length_squared() <= f32::EPSILON {
            return Err(CameraError::InvalidUp(self.up));
        }
        if !(self.movement_speed.is_finite() && self.movement_speed >= 0.0) {
            return Err(CameraError::InvalidSpeed(self.movement_speed));
        }
        check_bounds("eye", self.eye, self.eye_limit)?;
        check_bounds("look-at", self.look_at, self.look_at_limit)?;
        Ok(())
    }
}

fn check_bounds(name: &'static str, position: Vec3, limit: Vec3) -> Result<(), CameraError> {
    if !limit.is_finite() || limit.cmplt(Vec3::ZERO).any() {
        return Err(CameraError::InvalidLimit { name, limit });
    }
    if !position.is_finite() || position.abs().cmpgt(limit).any() {
        return Err(CameraError::OutOfBounds {
            name,
            position,
            limit,
        });
    }
    Ok(())
}
