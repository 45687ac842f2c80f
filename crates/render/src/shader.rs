use crate::error::RenderError;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// Entry point every source of this stage must export.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub code: String,
}

/// A vertex input a program reads, bound by name at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub location: u32,
    pub dimension: u32,
}

/// Shader sources looked up by id, the way a page looks up script elements.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    sources: BTreeMap<String, ShaderSource>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, replacing any previous one under `id`.
    pub fn insert(&mut self, id: impl Into<String>, stage: ShaderStage, code: impl Into<String>) {
        let id = id.into();
        tracing::debug!(%id, %stage, "registered shader source");
        self.sources.insert(
            id,
            ShaderSource {
                stage,
                code: code.into(),
            },
        );
    }

    pub fn get(&self, id: &str) -> Result<&ShaderSource, RenderError> {
        self.sources
            .get(id)
            .ok_or_else(|| RenderError::MissingShaderSource(id.to_string()))
    }

    /// Like [`ShaderLibrary::get`], but also require `stage`.
    pub fn get_stage(&self, id: &str, stage: ShaderStage) -> Result<&ShaderSource, RenderError> {
        let source = self.get(id)?;
        if source.stage != stage {
            return Err(RenderError::WrongShaderStage {
                id: id.to_string(),
                expected: stage.name(),
                actual: source.stage.name(),
            });
        }
        Ok(source)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
