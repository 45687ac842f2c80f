use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A key the camera reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
}

/// Which accumulator a key feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulator {
    /// Moves the eye.
    Movement,
    /// Moves the look-at point.
    Look,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// The contribution of one held key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub target: Accumulator,
    pub axis: Axis,
    /// Signed value added while pressed.
    pub unit: f32,
}

impl Binding {
    /// The modification vector applied on press (negated on release).
    pub fn modification(&self) -> Vec3 {
        self.axis.unit() * self.unit
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown key: {0:?} (expected one of w, a, s, d, left, right, up, down)")]
    UnknownKey(String),
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
    ];

    /// Map a legacy DOM `keyCode` to a key. Codes outside the table are `None`.
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(Key::Left),
            38 => Some(Key::Up),
            39 => Some(Key::Right),
            40 => Some(Key::Down),
            87 => Some(Key::W),
            65 => Some(Key::A),
            83 => Some(Key::S),
            68 => Some(Key::D),
            _ => None,
        }
    }

    pub fn key_code(self) -> u32 {
        match self {
            Key::Left => 37,
            Key::Up => 38,
            Key::Right => 39,
            Key::Down => 40,
            Key::W => 87,
            Key::A => 65,
            Key::S => 83,
            Key::D => 68,
        }
    }

    pub fn binding(self) -> Binding {
        let (target, axis, unit) = match self {
            Key::Left => (Accumulator::Look, Axis::X, -1.0),
            Key::Right => (Accumulator::Look, Axis::X, 1.0),
            Key::Up => (Accumulator::Look, Axis::Y, 1.0),
            Key::Down => (Accumulator::Look, Axis::Y, -1.0),
            Key::W => (Accumulator::Movement, Axis::Z, 1.0),
            Key::S => (Accumulator::Movement, Axis::Z, -1.0),
            Key::A => (Accumulator::Movement, Axis::X, -1.0),
            Key::D => (Accumulator::Movement, Axis::X, 1.0),
        };
        Binding { target, axis, unit }
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::Left => "left",
            Key::Right => "right",
            Key::Up => "up",
            Key::Down => "down",
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Key::ALL
            .into_iter()
            .find(|key| key.name() == lowered)
            .ok_or_else(|| InputError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_code_table() {
        assert_eq!(Key::from_key_code(37), Some(Key::Left));
        assert_eq!(Key::from_key_code(38), Some(Key::Up));
        assert_eq!(Key::from_key_code(39), Some(Key::Right));
        assert_eq!(Key::from_key_code(40), Some(Key::Down));
        assert_eq!(Key::from_key_code(87), Some(Key::W));
        assert_eq!(Key::from_key_code(65), Some(Key::A));
        assert_eq!(Key::from_key_code(83), Some(Key::S));
        assert_eq!(Key::from_key_code(68), Some(Key::D));
    }

    #[test]
    fn unknown_key_codes_are_none() {
        for code in [0, 13, 32, 41, 69, 81, 255] {
            assert_eq!(Key::from_key_code(code), None, "code {code}");
        }
    }

    #[test]
    fn key_code_round_trips_for_every_key() {
        for key in Key::ALL {
            assert_eq!(Key::from_key_code(key.key_code()), Some(key));
        }
    }

    #[test]
    fn arrows_feed_look_and_wasd_feed_movement() {
        for key in [Key::Left, Key::Right, Key::Up, Key::Down] {
            assert_eq!(key.binding().target, Accumulator::Look);
        }
        for key in [Key::W, Key::A, Key::S, Key::D] {
            assert_eq!(key.binding().target, Accumulator::Movement);
        }
    }

    #[test]
    fn binding_modifications() {
        assert_eq!(Key::Left.binding().modification(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(Key::Up.binding().modification(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(Key::W.binding().modification(), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(Key::S.binding().modification(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(Key::D.binding().modification(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn parse_key_names() {
        assert_eq!("w".parse::<Key>(), Ok(Key::W));
        assert_eq!("LEFT".parse::<Key>(), Ok(Key::Left));
        assert_eq!(" d ".parse::<Key>(), Ok(Key::D));
        assert_eq!(
            "space".parse::<Key>(),
            Err(InputError::UnknownKey("space".into()))
        );
    }

    #[test]
    fn display_matches_parse() {
        for key in Key::ALL {
            assert_eq!(key.to_string().parse::<Key>(), Ok(key));
        }
    }
}
