use thiserror::Error;

/// Top-level error type for the section generator.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("transform is not invertible")]
    SingularTransform,
}

/// Errors related to mesh topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("face index {index} is out of range (vertex count = {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to mesh operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported stage: {0}")]
    Unsupported(String),
}

/// Errors related to triangulation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("triangulation failed: {0}")]
    Failed(String),
}

/// Errors related to the shape library.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing asset: {0}")]
    MissingAsset(String),

    #[error("invalid asset {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Errors raised while orchestrating worker runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid worker arguments: {0}")]
    InvalidArguments(String),

    #[error("failed to spawn worker {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("worker stream unavailable: {0}")]
    StreamUnavailable(&'static str),
}

/// Convenience type alias for results using [`SectionError`].
pub type Result<T> = std::result::Result<T, SectionError>;
