//! Error Handling
//!
//! Unified error types for the orchestration layer. Pipeline variants wrap
//! the underlying gateway error with enough context (domain, round, persona)
//! to locate the failure in logs, and `is_aborted` looks through the
//! wrappers so user-initiated stops are never reported as failures.

use thiserror::Error;

use noesis_core::CoreError;
use noesis_llm::LlmError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// A domain analysis task failed; aborts the whole analysis.
    #[error("Analysis of domain '{domain}' failed: {source}")]
    Domain {
        domain: String,
        #[source]
        source: LlmError,
    },

    /// A comprehensive-analysis round task failed.
    #[error("Round {round} failed for '{subject}': {source}")]
    Round {
        round: u8,
        subject: String,
        #[source]
        source: LlmError,
    },

    /// A persona turn sub-call failed; the turn is not committed.
    #[error("Persona '{persona}' turn failed: {source}")]
    Chat {
        persona: String,
        #[source]
        source: LlmError,
    },

    /// Gateway errors outside any pipeline wrapper
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Core errors (auto-converted)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
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

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is a user-initiated stop, looking through the
    /// pipeline context wrappers.
    pub fn is_aborted(&self) -> bool {
        match self {
            AppError::Llm(source)
            | AppError::Domain { source, .. }
            | AppError::Round { source, .. }
            | AppError::Chat { source, .. } => source.is_aborted(),
            _ => false,
        }
    }

    /// Text suitable for the user-facing error area.
    ///
    /// Aborts are a deliberate stop, not a failure.
    pub fn user_message(&self) -> String {
        if self.is_aborted() {
            "Stopped by user.".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Convert AppError to a string for boundary layers
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
