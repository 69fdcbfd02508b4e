//! # Error Module
//!
//! Domain errors for Rollcall, built with thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Infrastructure failures live in the persistence layer; these are the
/// rule violations a caller can fix by changing its input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No identifying field was supplied to a lookup.
    #[error("Invalid input: at least one of identifier, name or token is required")]
    InvalidInput,

    #[error("Participant already exists: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CoreError::InvalidInput)
    }
}
