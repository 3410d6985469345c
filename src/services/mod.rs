//! Service layer: goal catalog, progress increments and the optimistic view.

pub mod goal_service;
pub mod progress_service;
pub mod progress_view;

pub use goal_service::{GoalService, NewGoal};
pub use progress_service::ProgressService;
pub use progress_view::{FailureNotice, MarkOutcome, PendingMark, ProgressBoard, ProgressView};
