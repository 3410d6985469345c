//! Tallyboard - weekly goal progress tracking
//!
//! Tallyboard keeps one counter per goal, subject and week. Counters are
//! incremented through a single atomic store statement when it is available
//! and through a read-modify-write fallback when it is not, always capped at
//! the goal's weekly target.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the ports adapters implement
//! - **Adapter Layer** (`adapters`): SQLite and in-memory stores
//! - **Service Layer** (`services`): Increment protocol and optimistic view
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tallyboard::adapters::sqlite::{initialize_database, SqliteGoalRepository, SqliteProgressRepository};
//! use tallyboard::services::ProgressService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = initialize_database(&Default::default()).await?;
//!     let service = ProgressService::new(
//!         Arc::new(SqliteProgressRepository::new(pool.clone())),
//!         Arc::new(SqliteGoalRepository::new(pool)),
//!     );
//!     let outcome = service.request_increment(goal_id, subject_id, &chrono::Local::now()).await?;
//!     println!("{} via {}", outcome.count, outcome.path.as_str());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Cap, Config, DatabaseConfig, Goal, GoalScope, IncrementOutcome, IncrementPath, LoggingConfig,
    ProgressConfig, ProgressCounter, ProgressKey, WeekKey, UNBOUNDED_CAP,
};
pub use domain::ports::{AtomicIncrement, GoalRepository, IdentityProvider, ProgressRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{GoalService, ProgressBoard, ProgressService, ProgressView};
