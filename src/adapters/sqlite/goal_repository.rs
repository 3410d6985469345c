//! SQLite implementation of the GoalRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Goal, GoalScope};
use crate::domain::ports::GoalRepository;

#[derive(Clone)]
pub struct SqliteGoalRepository {
    pool: SqlitePool,
}

impl SqliteGoalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalRepository for SqliteGoalRepository {
    async fn create(&self, goal: &Goal) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO goals (id, team_id, subject_id, is_team_goal, goal_type, title, description, weekly_target, created_by, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(goal.id.to_string())
        .bind(goal.team_id.to_string())
        .bind(goal.scope.subject_id().map(|id| id.to_string()))
        .bind(goal.scope.is_group())
        .bind(&goal.goal_type)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(i64::from(goal.weekly_target))
        .bind(goal.created_by.map(|id| id.to_string()))
        .bind(goal.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Goal>> {
        let row: Option<GoalRow> = sqlx::query_as(
            "SELECT id, team_id, subject_id, is_team_goal, goal_type, title, description, weekly_target, created_by, created_at FROM goals WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_for_team(&self, team_id: Uuid) -> DomainResult<Vec<Goal>> {
        let rows: Vec<GoalRow> = sqlx::query_as(
            "SELECT id, team_id, subject_id, is_team_goal, goal_type, title, description, weekly_target, created_by, created_at FROM goals WHERE team_id = ? ORDER BY created_at DESC"
        )
        .bind(team_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_for_subject(&self, subject_id: Uuid) -> DomainResult<Vec<Goal>> {
        let rows: Vec<GoalRow> = sqlx::query_as(
            "SELECT id, team_id, subject_id, is_team_goal, goal_type, title, description, weekly_target, created_by, created_at FROM goals WHERE subject_id = ? ORDER BY created_at DESC"
        )
        .bind(subject_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct GoalRow {
    id: String,
    team_id: String,
    subject_id: Option<String>,
    is_team_goal: bool,
    goal_type: String,
    title: String,
    description: String,
    weekly_target: i64,
    created_by: Option<String>,
    created_at: String,
}

impl TryFrom<GoalRow> for Goal {
    type Error = DomainError;

    fn try_from(row: GoalRow) -> Result<Self, Self::Error> {
        let scope = match (row.is_team_goal, parse_optional_uuid(row.subject_id)?) {
            (true, _) => GoalScope::Group,
            (false, Some(subject_id)) => GoalScope::Subject(subject_id),
            (false, None) => {
                return Err(DomainError::SerializationError(format!(
                    "Goal {} has neither a subject nor the team flag",
                    row.id
                )))
            }
        };

        let weekly_target = u32::try_from(row.weekly_target).map_err(|_| {
            DomainError::SerializationError(format!("Invalid weekly_target: {}", row.weekly_target))
        })?;

        Ok(Goal {
            id: parse_uuid(&row.id)?,
            team_id: parse_uuid(&row.team_id)?,
            scope,
            goal_type: row.goal_type,
            title: row.title,
            description: row.description,
            weekly_target,
            created_by: parse_optional_uuid(row.created_by)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
