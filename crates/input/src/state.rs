use crate::key::{Accumulator, Key};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Currently-held directional intent.
///
/// Each key adds its unit vector on press and subtracts it on release, so
/// opposing keys cancel. Both vectors are clamped to [-1, 1] per component
/// after every change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    movement: Vec3,
    look: Vec3,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Movement intent: x strafes, y rises, z moves forward.
    pub fn movement(&self) -> Vec3 {
        self.movement
    }

    /// Look-at intent: x pans right, y pans up.
    pub fn look(&self) -> Vec3 {
        self.look
    }

    /// Apply a press (`pressed == true`) or release of `key`.
    pub fn apply(&mut self, key: Key, pressed: bool) {
        let binding = key.binding();
        let sign = if pressed { 1.0 } else { -1.0 };
        let modification = binding.modification() * sign;

        let accumulator = match binding.target {
            Accumulator::Movement => &mut self.movement,
            Accumulator::Look => &mut self.look,
        };
        *accumulator = (*accumulator + modification).clamp(Vec3::NEG_ONE, Vec3::ONE);

        tracing::debug!(
            key = %key,
            pressed,
            movement = ?self.movement,
            look = ?self.look,
            "input changed"
        );
    }

    /// Drop all held intent.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        self.movement == Vec3::ZERO && self.look == Vec3::ZERO
    }
}
