use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// A named, flat float array read `dimension` floats per vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexAttribute {
    pub name: String,
    pub data: Vec<f32>,
    pub dimension: u32,
}

impl VertexAttribute {
    pub fn new(name: impl Into<String>, data: Vec<f32>, dimension: u32) -> Self {
        Self {
            name: name.into(),
            data,
            dimension,
        }
    }

    /// Check shape and return the vertex count.
    pub fn validate(&self) -> Result<usize, RenderError> {
        let invalid = |reason: String| RenderError::InvalidAttribute {
            name: self.name.clone(),
            reason,
        };
        if !(1..=4).contains(&self.dimension) {
            return Err(invalid(format!(
                "dimension must be 1..=4, got {}",
                self.dimension
            )));
        }
        if self.data.is_empty() {
            return Err(invalid("no data".into()));
        }
        let dim = self.dimension as usize;
        if self.data.len() % dim != 0 {
            return Err(invalid(format!(
                "{} floats is not a multiple of dimension {}",
                self.data.len(),
                self.dimension
            )));
        }
        Ok(self.data.len() / dim)
    }
}

/// How a mesh is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    /// Consecutive vertices, no index buffer.
    Arrays { first: u32, count: u32 },
    /// Indexed draw over the whole index buffer.
    Indexed { count: u32 },
}

/// Vertex attributes plus optional 16-bit indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub attributes: Vec<VertexAttribute>,
    pub indices: Option<Vec<u16>>,
}

impl MeshData {
    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check that every attribute agrees on the vertex count and every index
    /// is in range. Returns the vertex count.
    pub fn validate(&self) -> Result<usize, RenderError> {
        let mut vertex_count = None;
        for attribute in &self.attributes {
            let count = attribute.validate()?;
            match vertex_count {
                None => vertex_count = Some(count),
                Some(expected) if expected != count => {
                    return Err(RenderError::InvalidAttribute {
                        name: attribute.name.clone(),
                        reason: format!("{count} vertices, other attributes have {expected}"),
                    });
                }
                Some(_) => {}
            }
        }
        let vertex_count = vertex_count.ok_or_else(|| RenderError::InvalidAttribute {
            name: String::new(),
            reason: "mesh has no attributes".into(),
        })?;

        if let Some(indices) = &self.indices {
            if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(RenderError::InvalidAttribute {
                    name: "indices".into(),
                    reason: format!("index {bad} out of range for {vertex_count} vertices"),
                });
            }
        }
        Ok(vertex_count)
    }

    pub fn vertex_count(&self) -> usize {
        self.attributes
            .first()
            .map(|a| a.data.len() / a.dimension.max(1) as usize)
            .unwrap_or(0)
    }

    pub fn draw_call(&self) -> DrawCall {
        match &self.indices {
            Some(indices) => DrawCall::Indexed {
                count: indices.len() as u32,
            },
            None => DrawCall::Arrays {
                first: 0,
                count: self.vertex_count() as u32,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_vertex_count() {
        let attr = VertexAttribute::new("position", vec![0.0; 9], 3);
        assert_eq!(attr.validate().unwrap(), 3);
    }

    #[test]
    fn attribute_rejects_bad_shapes() {
        let ragged = VertexAttribute::new("position", vec![0.0; 8], 3);
        assert!(matches!(
            ragged.validate(),
            Err(RenderError::InvalidAttribute { .. })
        ));

        let wide = VertexAttribute::new("position", vec![0.0; 10], 5);
        assert!(wide.validate().is_err());

        let empty = VertexAttribute::new("position", Vec::new(), 3);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn mesh_rejects_mismatched_attributes() {
        let mesh = MeshData {
            attributes: vec![
                VertexAttribute::new("position", vec![0.0; 9], 3),
                VertexAttribute::new("color", vec![1.0; 8], 4),
            ],
            indices: None,
        };
        let err = mesh.validate().unwrap_err();
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn mesh_rejects_out_of_range_indices() {
        let mesh = MeshData {
            attributes: vec![VertexAttribute::new("position", vec![0.0; 9], 3)],
            indices: Some(vec![0, 1, 3]),
        };
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn draw_call_depends_on_indices() {
        let mut mesh = MeshData {
            attributes: vec![VertexAttribute::new("position", vec![0.0; 12], 3)],
            indices: None,
        };
        assert_eq!(mesh.draw_call(), DrawCall::Arrays { first: 0, count: 4 });

        mesh.indices = Some(vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.draw_call(), DrawCall::Indexed { count: 6 });
    }

    #[test]
    fn attribute_lookup_by_name() {
        let mesh = MeshData {
            attributes: vec![VertexAttribute::new("position", vec![0.0; 3], 3)],
            indices: None,
        };
        assert!(mesh.attribute("position").is_some());
        assert!(mesh.attribute("normal").is_none());
    }
}
