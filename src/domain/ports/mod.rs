//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters must implement:
//! - AtomicIncrement: the indivisible increment-and-cap procedure
//! - ProgressRepository: row-level counter reads and writes
//! - GoalRepository: the goal catalog
//! - IdentityProvider: who is acting

pub mod goal_repository;
pub mod identity;
pub mod progress_repository;

pub use goal_repository::GoalRepository;
pub use identity::{IdentityProvider, StaticIdentity};
pub use progress_repository::{AtomicIncrement, ProgressRepository};
