use thiserror::Error;

/// Top-level error type for the cardiac visualization engine.
#[derive(Debug, Error)]
pub enum CardioError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Viewer(#[from] ViewerError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to path geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("a path needs at least 2 control points, got {count}")]
    TooFewControlPoints { count: usize },

    #[error("control point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// Errors reported by the viewer facade.
///
/// Every variant is a precondition failure: the call was ignored and no
/// visual state was changed.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("heart model is not loaded yet")]
    ModelNotLoaded,

    #[error("viewer has been disposed")]
    Disposed,

    #[error("diagnosis input is missing")]
    MissingDiagnosis,

    #[error("malformed diagnosis: {0}")]
    MalformedDiagnosis(#[from] serde_json::Error),
}

/// Errors raised while loading the heart model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load model from {source_path}: {reason}")]
    Failed { source_path: String, reason: String },

    #[error("model {0} contains no meshes")]
    EmptyModel(String),
}

/// Errors related to viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`CardioError`].
pub type Result<T> = std::result::Result<T, CardioError>;
