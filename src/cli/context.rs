//! Wiring shared by CLI commands.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::sqlite::{initialize_database, SqliteGoalRepository, SqliteProgressRepository};
use crate::domain::models::{Cap, Config};
use crate::domain::ports::StaticIdentity;
use crate::services::{GoalService, ProgressService};

pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
}

impl AppContext {
    pub async fn open(config: Config) -> Result<Self> {
        let pool = initialize_database(&config.database)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?;
        Ok(Self { config, pool })
    }

    pub fn goal_service(&self) -> GoalService<SqliteGoalRepository> {
        GoalService::new(Arc::new(SqliteGoalRepository::new(self.pool.clone())))
    }

    pub fn progress_service(&self) -> Result<ProgressService<SqliteProgressRepository, SqliteGoalRepository>> {
        let store = SqliteProgressRepository::new(self.pool.clone())
            .with_atomic_procedure(self.config.progress.atomic_procedure);
        let unbounded = Cap::new(self.config.progress.unbounded_cap)?;

        Ok(ProgressService::new(
            Arc::new(store),
            Arc::new(SqliteGoalRepository::new(self.pool.clone())),
        )
        .with_unbounded_cap(unbounded))
    }

    /// Acting subject: the explicit flag wins over configuration.
    pub fn identity(&self, subject_flag: Option<Uuid>) -> StaticIdentity {
        StaticIdentity::new(subject_flag.or(self.config.identity.subject_id))
    }
}
