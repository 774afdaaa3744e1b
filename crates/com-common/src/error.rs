//! Error types for center-of-mass analysis.

use thiserror::Error;

/// Result type alias using ComError.
pub type ComResult<T> = Result<T, ComError>;

/// Primary error type for COM analysis operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComError {
    // === Geometry Errors ===
    #[error("can only handle 2D signals currently, got {dims}D signal")]
    UnsupportedGeometry { dims: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    // === Parameter Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Result Errors ===
    #[error("Duplicate result key: {0}")]
    DuplicateResultKey(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl ComError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Stable name of the error kind, for presentation layers.
    pub fn kind(&self) -> &'static str {
        match self {
            ComError::UnsupportedGeometry { .. } => "UnsupportedGeometryError",
            ComError::ShapeMismatch(_) => "ShapeMismatchError",
            ComError::InvalidParameter { .. } => "InvalidParameterError",
            ComError::DuplicateResultKey(_) => "DuplicateResultKeyError",
            ComError::Render(_) => "RenderError",
        }
    }
}
