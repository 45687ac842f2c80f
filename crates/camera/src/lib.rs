//! First-person look-at camera.
//!
//! Held keys accumulate into movement and look intent; every frame the host
//! advances the camera by the elapsed milliseconds and asks for a fresh
//! view-projection matrix.
//!
//! # Invariants
//! - The up vector is unit length; near < far, both positive.
//! - Eye and look-at stay within their configured per-axis limits.
//! - Movement is framerate independent: distance = delta_ms * speed.

mod camera;
mod config;

pub use camera::{Basis, Camera, constrain, simple_mvp};
pub use config::{CameraConfig, CameraError};

pub fn crate_info() -> &'static str {
    "walkthrough-camera v0.1.0"
}
