//! SQLite implementation of the progress counter ports.
//!
//! The atomic procedure is a single `INSERT .. ON CONFLICT DO UPDATE ..
//! RETURNING` statement: SQLite holds the write lock for the whole statement,
//! so concurrent increments on one key are linearized.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AtomicAttempt, Cap, ProgressCounter, ProgressKey, WeekKey};
use crate::domain::ports::{AtomicIncrement, ProgressRepository};

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

#[derive(Clone)]
pub struct SqliteProgressRepository {
    pool: SqlitePool,
    atomic_procedure: bool,
}

impl SqliteProgressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            atomic_procedure: true,
        }
    }

    /// Toggle the atomic procedure. When disabled it reports itself as not
    /// installed and every increment takes the fallback path.
    pub fn with_atomic_procedure(mut self, enabled: bool) -> Self {
        self.atomic_procedure = enabled;
        self
    }
}

#[async_trait]
impl AtomicIncrement for SqliteProgressRepository {
    async fn increment_atomic(&self, key: &ProgressKey, cap: Cap) -> DomainResult<AtomicAttempt> {
        if !self.atomic_procedure {
            return Ok(AtomicAttempt::Unavailable(
                "atomic increment procedure not installed".to_string(),
            ));
        }

        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"INSERT INTO goal_progress (id, goal_id, subject_id, week_start, completed_count, updated_at)
               VALUES (?, ?, ?, ?, 1, ?)
               ON CONFLICT (goal_id, subject_id, week_start) DO UPDATE SET
                   completed_count = MIN(goal_progress.completed_count + 1, ?),
                   updated_at = excluded.updated_at
               RETURNING completed_count"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(key.goal_id.to_string())
        .bind(key.subject_id.to_string())
        .bind(key.week.to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(i64::from(cap.get()))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok((count,)) => Ok(AtomicAttempt::Applied(count_from_db(count)?)),
            Err(err) => classify_atomic_failure(err),
        }
    }
}

/// Decide whether a failed atomic statement means the procedure is
/// unavailable or that the counter itself rejected the write.
fn classify_atomic_failure(err: sqlx::Error) -> DomainResult<AtomicAttempt> {
    match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed => Ok(AtomicAttempt::Unavailable(err.to_string())),
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation()
                || db_err.is_check_violation()
                || db_err.is_foreign_key_violation()
            {
                return Err(DomainError::DatabaseError(db_err.message().to_string()));
            }

            let primary_code = db_err
                .code()
                .and_then(|c| c.parse::<i32>().ok())
                .map(|c| c & 0xff);
            let message = db_err.message();
            let missing_schema = message.contains("no such table")
                || message.contains("no such column")
                || message.contains("no such function");

            if matches!(primary_code, Some(SQLITE_BUSY | SQLITE_LOCKED)) || missing_schema {
                Ok(AtomicAttempt::Unavailable(message.to_string()))
            } else {
                Err(DomainError::DatabaseError(message.to_string()))
            }
        }
        _ => Err(err.into()),
    }
}

#[async_trait]
impl ProgressRepository for SqliteProgressRepository {
    async fn find_by_key(&self, key: &ProgressKey) -> DomainResult<Option<ProgressCounter>> {
        let row: Option<ProgressRow> = sqlx::query_as(
            "SELECT id, goal_id, subject_id, week_start, completed_count, updated_at FROM goal_progress WHERE goal_id = ? AND subject_id = ? AND week_start = ? LIMIT 1"
        )
        .bind(key.goal_id.to_string())
        .bind(key.subject_id.to_string())
        .bind(key.week.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<ProgressCounter>> {
        let row: Option<ProgressRow> = sqlx::query_as(
            "SELECT id, goal_id, subject_id, week_start, completed_count, updated_at FROM goal_progress WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert(&self, counter: &ProgressCounter) -> DomainResult<()> {
        let result = sqlx::query(
            r#"INSERT INTO goal_progress (id, goal_id, subject_id, week_start, completed_count, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#
        )
        .bind(counter.id.to_string())
        .bind(counter.key.goal_id.to_string())
        .bind(counter.key.subject_id.to_string())
        .bind(counter.key.week.to_string())
        .bind(i64::from(counter.completed_count))
        .bind(counter.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DomainError::DuplicateCounter(counter.key))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update_count(&self, id: Uuid, completed_count: u32) -> DomainResult<ProgressCounter> {
        let row: Option<ProgressRow> = sqlx::query_as(
            r#"UPDATE goal_progress SET completed_count = ?, updated_at = ?
               WHERE id = ?
               RETURNING id, goal_id, subject_id, week_start, completed_count, updated_at"#
        )
        .bind(i64::from(completed_count))
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| DomainError::DatabaseError(format!("Progress counter {id} not found")))?
            .try_into()
    }
}

fn count_from_db(count: i64) -> DomainResult<u32> {
    u32::try_from(count)
        .map_err(|_| DomainError::SerializationError(format!("Invalid completed_count: {count}")))
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    id: String,
    goal_id: String,
    subject_id: String,
    week_start: String,
    completed_count: i64,
    updated_at: String,
}

impl TryFrom<ProgressRow> for ProgressCounter {
    type Error = DomainError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        let week = WeekKey::parse(&row.week_start)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        Ok(ProgressCounter {
            id: parse_uuid(&row.id)?,
            key: ProgressKey::new(parse_uuid(&row.goal_id)?, parse_uuid(&row.subject_id)?, week),
            completed_count: count_from_db(row.completed_count)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
