/// Every way drawing setup can fail.
///
/// None of these are retried; the host reports the error and stops.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create drawing surface: {0}")]
    CreateSurface(String),
    #[error("no compatible GPU adapter found; hardware rendering is not supported")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    RequestDevice(String),
    #[error("surface reports no supported texture formats")]
    UnsupportedSurface,
    #[error("no shader source registered under id {0:?}")]
    MissingShaderSource(String),
    #[error("shader {id:?} is a {actual} shader, expected {expected}")]
    WrongShaderStage {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("shader {id:?} failed to compile: {message}")]
    ShaderCompile { id: String, message: String },
    #[error("program failed to link: {0}")]
    ProgramLink(String),
    #[error("attribute {name:?}: {reason}")]
    InvalidAttribute { name: String, reason: String },
    #[error("program has no attribute named {0:?}")]
    UnknownAttribute(String),
    #[error("attribute {name:?} has dimension {actual}, program expects {expected}")]
    AttributeDimension {
        name: String,
        expected: u32,
        actual: u32,
    },
    #[error("mesh is missing attribute {0:?} required by the program")]
    MissingAttribute(String),
}
