//! Goal catalog port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Goal;

/// Repository interface for Goal persistence.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Create a new goal.
    async fn create(&self, goal: &Goal) -> DomainResult<()>;

    /// Get a goal by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Goal>>;

    /// Goals belonging to a team, newest first.
    async fn list_for_team(&self, team_id: Uuid) -> DomainResult<Vec<Goal>>;

    /// Goals owned by a single subject, newest first.
    async fn list_for_subject(&self, subject_id: Uuid) -> DomainResult<Vec<Goal>>;
}
