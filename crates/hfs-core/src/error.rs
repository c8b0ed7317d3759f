use thiserror::Error;

#[derive(Debug, Error)]
pub enum HfsError {
    /// Malformed input detected before any computation ran.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Numerically undefined result, e.g. a height function returning NaN.
    #[error("Computation error: {0}")]
    Computation(String),

    /// Failure reported by an external geometry, display, or transaction capability.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HfsError>;
