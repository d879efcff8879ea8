//! Core Error Types
//!
//! Defines the foundational error types used across the Noesis workspace.
//! These error types are dependency-free (only thiserror + std) to keep the
//! core crate lightweight.
//!
//! The application crate extends these with pipeline-context variants
//! (domain, round, persona) that wrap gateway errors.

use thiserror::Error;

/// Core error type for the Noesis workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors (missing credentials, bad endpoint, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (empty keyword selection, malformed item code, etc.)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors (item code missing from the reference index)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
