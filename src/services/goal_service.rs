//! Goal service implementing catalog business logic.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Goal, GoalScope};
use crate::domain::ports::GoalRepository;

/// Fields for a new goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub team_id: Uuid,
    pub scope: GoalScope,
    pub goal_type: String,
    pub title: String,
    pub description: String,
    pub weekly_target: u32,
    pub created_by: Option<Uuid>,
}

pub struct GoalService<R: GoalRepository> {
    repository: Arc<R>,
}

impl<R: GoalRepository> GoalService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new goal.
    pub async fn create_goal(&self, new_goal: NewGoal) -> DomainResult<Goal> {
        let mut goal = Goal::new(new_goal.team_id, new_goal.title, new_goal.scope)
            .with_type(new_goal.goal_type)
            .with_description(new_goal.description)
            .with_weekly_target(new_goal.weekly_target);

        if let Some(creator) = new_goal.created_by {
            goal = goal.with_created_by(creator);
        }

        goal.validate().map_err(DomainError::ValidationFailed)?;
        self.repository.create(&goal).await?;

        tracing::info!(goal_id = %goal.id, team_id = %goal.team_id, target = goal.weekly_target, "goal created");
        Ok(goal)
    }

    /// Store a fully formed goal unless one with the same id exists.
    /// Returns whether the goal was inserted.
    pub async fn import_goal(&self, goal: &Goal) -> DomainResult<bool> {
        goal.validate().map_err(DomainError::ValidationFailed)?;
        if self.repository.get(goal.id).await?.is_some() {
            tracing::debug!(goal_id = %goal.id, "goal already present, skipping");
            return Ok(false);
        }

        self.repository.create(goal).await?;
        Ok(true)
    }

    /// Get a goal by ID.
    pub async fn get_goal(&self, id: Uuid) -> DomainResult<Option<Goal>> {
        self.repository.get(id).await
    }

    pub async fn list_team_goals(&self, team_id: Uuid) -> DomainResult<Vec<Goal>> {
        self.repository.list_for_team(team_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteGoalRepository};

    async fn setup_service() -> GoalService<SqliteGoalRepository> {
        let pool = create_migrated_test_pool().await.unwrap();
        GoalService::new(Arc::new(SqliteGoalRepository::new(pool)))
    }

    fn new_goal(title: &str) -> NewGoal {
        NewGoal {
            team_id: Uuid::new_v4(),
            scope: GoalScope::Group,
            goal_type: "Character".to_string(),
            title: title.to_string(),
            description: String::new(),
            weekly_target: 7,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_create_goal() {
        let service = setup_service().await;
        let goal = service.create_goal(new_goal("Wall Ball 100/day")).await.unwrap();

        assert_eq!(goal.goal_type, "Character");
        let stored = service.get_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(stored.weekly_target, 7);
    }

    #[tokio::test]
    async fn test_create_goal_rejects_blank_title() {
        let service = setup_service().await;
        let err = service.create_goal(new_goal("")).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_list_team_goals() {
        let service = setup_service().await;
        let first = service.create_goal(new_goal("One")).await.unwrap();
        let mut second = new_goal("Two");
        second.team_id = first.team_id;
        service.create_goal(second).await.unwrap();

        assert_eq!(service.list_team_goals(first.team_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_import_goal_is_idempotent() {
        let service = setup_service().await;
        let goal = Goal::new(Uuid::new_v4(), "Mobility 2x per week", GoalScope::Subject(Uuid::new_v4()))
            .with_weekly_target(2);

        assert!(service.import_goal(&goal).await.unwrap());
        assert!(!service.import_goal(&goal).await.unwrap());
        assert_eq!(service.list_team_goals(goal.team_id).await.unwrap().len(), 1);
    }
}
