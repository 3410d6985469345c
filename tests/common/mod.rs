//! Common test utilities for integration tests
//!
//! Provides shared fixtures used across multiple integration test files.

#![allow(dead_code)]

use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use tallyboard::adapters::sqlite::{
    all_embedded_migrations, create_migrated_test_pool, create_pool, Migrator, PoolConfig,
    SqliteGoalRepository,
};
use tallyboard::domain::models::{Goal, GoalScope};
use tallyboard::domain::ports::GoalRepository;

/// Create a temporary test database
///
/// Returns the path to a SQLite database file in a temporary directory.
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

/// Multi-connection pool on a migrated file database.
pub async fn file_pool(max_connections: u32) -> (TempDir, SqlitePool) {
    let (dir, path) = temp_db_path();
    let config = PoolConfig {
        max_connections,
        ..PoolConfig::default()
    };
    let pool = create_pool(&format!("sqlite:{}", path.display()), Some(config))
        .await
        .expect("Failed to create file pool");
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("Failed to migrate file pool");
    (dir, pool)
}

/// Goal catalog backed by a migrated in-memory database.
pub async fn goal_repo() -> Arc<SqliteGoalRepository> {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    Arc::new(SqliteGoalRepository::new(pool))
}

/// Store a goal owned by `subject` with the given weekly target.
pub async fn create_goal(repo: &SqliteGoalRepository, subject: Uuid, weekly_target: u32) -> Goal {
    let goal = Goal::new(Uuid::new_v4(), "Improve exit velo", GoalScope::Subject(subject))
        .with_weekly_target(weekly_target);
    repo.create(&goal).await.expect("Failed to create goal");
    goal
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
