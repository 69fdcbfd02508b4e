//! Service layer errors
//!
//! "Already logged" and "participant not found" are outcomes, not errors;
//! see [`rollcall_core::ValidationOutcome`].

use crate::roster_file::RosterFileError;
use rollcall_core::CoreError;
use rollcall_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No identifying field supplied
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ledger storage failed; the request wrote nothing
    #[error("Store unavailable: {0}")]
    StoreUnavailable(PersistenceError),

    /// A direct append hit the one-record-per-scope constraint
    #[error("Already recorded: {0}")]
    AlreadyRecorded(String),

    #[error("Roster error: {0}")]
    Roster(CoreError),

    #[error("Roster file error: {0}")]
    RosterFile(#[from] RosterFileError),
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput => ServiceError::InvalidInput(err.to_string()),
            other => ServiceError::Roster(other),
        }
    }
}

impl From<PersistenceError> for ServiceError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::UniqueViolation(what) => ServiceError::AlreadyRecorded(what),
            other => ServiceError::StoreUnavailable(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::StoreUnavailable(PersistenceError::Database(err))
    }
}

impl ServiceError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ServiceError::InvalidInput(_))
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, ServiceError::StoreUnavailable(_))
    }

    pub fn is_already_recorded(&self) -> bool {
        matches!(self, ServiceError::AlreadyRecorded(_))
    }
}
