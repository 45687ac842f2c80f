use crate::mesh::{MeshData, VertexAttribute};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the per-vertex position attribute (3 floats).
pub const POSITION: &str = "position";
/// Name of the per-vertex RGBA color attribute (4 floats).
pub const COLOR: &str = "color";

/// The shapes the tutorial draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// Three vertices, drawn directly.
    Triangle,
    /// Four vertices, four indexed faces.
    #[default]
    Tetrahedron,
    /// Four vertices, two indexed triangles.
    Square,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown primitive {0:?} (expected triangle, tetrahedron or square)")]
pub struct UnknownPrimitive(pub String);

impl Primitive {
    pub const ALL: [Primitive; 3] = [
        Primitive::Triangle,
        Primitive::Tetrahedron,
        Primitive::Square,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Triangle => "triangle",
            Primitive::Tetrahedron => "tetrahedron",
            Primitive::Square => "square",
        }
    }

    pub fn mesh(self) -> MeshData {
        match self {
            Primitive::Triangle => triangle(),
            Primitive::Tetrahedron => tetrahedron(),
            Primitive::Square => square(),
        }
    }

    /// Cycle to the next shape (used by the desktop overlay and hotkey).
    pub fn next(self) -> Self {
        match self {
            Primitive::Triangle => Primitive::Tetrahedron,
            Primitive::Tetrahedron => Primitive::Square,
            Primitive::Square => Primitive::Triangle,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Primitive {
    type Err = UnknownPrimitive;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Primitive::ALL
            .into_iter()
            .find(|p| p.name() == lowered)
            .ok_or_else(|| UnknownPrimitive(s.to_string()))
    }
}

fn mesh(positions: Vec<f32>, colors: Vec<f32>, indices: Option<Vec<u16>>) -> MeshData {
    MeshData {
        attributes: vec![
            VertexAttribute::new(POSITION, positions, 3),
            VertexAttribute::new(COLOR, colors, 4),
        ],
        indices,
    }
}

fn triangle() -> MeshData {
    #[rustfmt::skip]
    let positions = vec![
         0.0,  1.0, 0.0,
        -1.0, -1.0, 0.0,
         1.0, -1.0, 0.0,
    ];
    #[rustfmt::skip]
    let colors = vec![
        1.0, 0.0, 0.0, 1.0,
        0.0, 1.0, 0.0, 1.0,
        0.0, 0.0, 1.0, 1.0,
    ];
    mesh(positions, colors, None)
}

fn tetrahedron() -> MeshData {
    #[rustfmt::skip]
    let positions = vec![
         1.0,  1.0,  1.0,
        -1.0, -1.0,  1.0,
        -1.0,  1.0, -1.0,
         1.0, -1.0, -1.0,
    ];
    #[rustfmt::skip]
    let colors = vec![
        1.0, 0.0, 0.0, 1.0,
        0.0, 1.0, 0.0, 1.0,
        0.0, 0.0, 1.0, 1.0,
        1.0, 1.0, 0.0, 1.0,
    ];
    // Counter-clockwise seen from outside.
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1,
        0, 1, 3,
        0, 3, 2,
        1, 2, 3,
    ];
    mesh(positions, colors, Some(indices))
}

fn square() -> MeshData {
    #[rustfmt::skip]
    let positions = vec![
        -1.0,  1.0, 0.0,
         1.0,  1.0, 0.0,
         1.0, -1.0, 0.0,
        -1.0, -1.0, 0.0,
    ];
    #[rustfmt::skip]
    let colors = vec![
        1.0, 1.0, 1.0, 1.0,
        1.0, 0.0, 0.0, 1.0,
        0.0, 1.0, 0.0, 1.0,
        0.0, 0.0, 1.0, 1.0,
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 3, 2,
        0, 2, 1,
    ];
    mesh(positions, colors, Some(indices))
}
