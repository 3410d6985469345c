//! Progress counter ports.
//!
//! Two seams are exposed: the atomic increment procedure, which performs the
//! read-check-write as one indivisible step, and the plain row operations
//! the fallback path composes when that procedure cannot run.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AtomicAttempt, Cap, ProgressCounter, ProgressKey};

/// Single round-trip, linearizable increment-and-cap.
#[async_trait]
pub trait AtomicIncrement: Send + Sync {
    /// Increment the counter for `key`, creating it on first use.
    ///
    /// Returns `AtomicAttempt::Unavailable` when the procedure itself cannot
    /// run. Failures that belong to the counter's own constraints come back
    /// as `Err` and must not trigger a fallback.
    async fn increment_atomic(&self, key: &ProgressKey, cap: Cap) -> DomainResult<AtomicAttempt>;
}

/// Row-level access to stored counters.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Point read by logical key.
    async fn find_by_key(&self, key: &ProgressKey) -> DomainResult<Option<ProgressCounter>>;

    /// Point read by row identity.
    async fn get(&self, id: Uuid) -> DomainResult<Option<ProgressCounter>>;

    /// Insert a new row. Fails with `DomainError::DuplicateCounter` when a
    /// row for the same key already exists.
    async fn insert(&self, counter: &ProgressCounter) -> DomainResult<()>;

    /// Overwrite the count of the row with this identity and return it.
    async fn update_count(&self, id: Uuid, completed_count: u32) -> DomainResult<ProgressCounter>;
}
