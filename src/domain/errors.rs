//! Domain errors for the tallyboard progress system.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::ProgressKey;

/// Domain-level errors that can occur while tracking weekly progress.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Transient infrastructure failure. Safe to retry from the caller.
    #[error("Progress store unavailable: {0}")]
    StoreUnavailable(String),

    /// A counter row already exists for the key (uniqueness violation on first insert).
    #[error("Progress counter already exists for {0}")]
    DuplicateCounter(ProgressKey),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Whether the caller may safely retry the whole request later.
    ///
    /// Only transient store unavailability qualifies; validation, race and
    /// unknown failures are never retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::WorkerCrashed => DomainError::StoreUnavailable(err.to_string()),
            _ => DomainError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
