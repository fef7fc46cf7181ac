//! Error types for vector generation.

use oasis_runtime_vectors_core::{CoreError, ValidationError};
use thiserror::Error;

/// Errors that can occur while generating or emitting vectors.
///
/// Every input is a fixed table, so any of these indicates a bug.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Address, signing or encoding failure in the core primitives.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A freshly signed transaction failed verification or basic validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The generator configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
