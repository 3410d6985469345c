//! Domain models for weekly progress tracking.

pub mod config;
pub mod goal;
pub mod progress;
pub mod week;

pub use config::{Config, DatabaseConfig, IdentityConfig, LoggingConfig, ProgressConfig};
pub use goal::{Goal, GoalScope};
pub use progress::{
    AtomicAttempt, Cap, IncrementOutcome, IncrementPath, ProgressCounter, ProgressKey,
    UNBOUNDED_CAP,
};
pub use week::WeekKey;
