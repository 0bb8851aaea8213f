use thiserror::Error;

/// Top-level error type for the clay deformation engine.
#[derive(Debug, Error)]
pub enum ClayError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error(transparent)]
    Brush(#[from] BrushError),
}

/// Errors raised while building or addressing a sculpt mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    Empty,

    #[error("triangle index {index} is out of range for {len} vertices")]
    IndexOutOfRange { index: u32, len: usize },

    #[error("degenerate mesh parameters: {0}")]
    Degenerate(String),
}

/// Errors related to the particle blob store.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("particle not found")]
    ParticleNotFound,

    #[error("invalid blob parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Errors related to brush configuration.
#[derive(Debug, Error)]
pub enum BrushError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

/// Convenience type alias for results using [`ClayError`].
pub type Result<T> = std::result::Result<T, ClayError>;
