//! Typed error for the qa-gateway crate.

use thiserror::Error;

/// Message used for every missing/empty field rejection.
pub const MISSING_FIELDS: &str = "Missing context or question";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A required input was absent or blank. Maps to a client error.
    #[error("{0}")]
    Validation(String),

    /// The request body could not be read as a question payload.
    #[error("{0}")]
    Malformed(String),

    /// No inference backend is available.
    #[error("{0}")]
    Configuration(String),

    /// The remote model call failed; carries the underlying message.
    #[error("{0}")]
    Inference(String),
}

impl QueryError {
    pub fn missing_fields() -> Self {
        QueryError::Validation(MISSING_FIELDS.to_string())
    }

    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::Validation(_))
    }
}
