//! Optimistic client view of progress counters.
//!
//! A `ProgressView` is the presentation layer's shadow of one goal's counter.
//! Marking progress bumps the displayed value straight away and hands back a
//! `PendingMark`; the caller settles it with the authoritative result, which
//! either replaces the displayed value or rolls the optimistic bump back.
//! While a mark is pending, further marks on the same goal are refused.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Cap, Goal, IncrementOutcome, IncrementPath};

/// Proof that a mark is in flight. Consumed when the mark settles.
#[derive(Debug)]
#[must_use = "a pending mark must be settled, or the goal stays locked"]
pub struct PendingMark {
    goal_id: Uuid,
    optimistic: u32,
}

impl PendingMark {
    pub fn goal_id(&self) -> Uuid {
        self.goal_id
    }

    /// The value displayed while the request is in flight.
    pub fn optimistic(&self) -> u32 {
        self.optimistic
    }
}

/// Transient message shown after a failed mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub message: String,
    /// The store was unreachable; trying again later may succeed.
    pub retryable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Another mark on this goal was still in flight, or the target is met.
    Suppressed,
    Confirmed { count: u32, path: IncrementPath },
    RolledBack(FailureNotice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    goal_id: Uuid,
    /// Weekly target; 0 means unbounded.
    target: u32,
    displayed: u32,
    in_flight: bool,
}

impl ProgressView {
    pub fn new(goal_id: Uuid, target: u32, displayed: u32) -> Self {
        Self {
            goal_id,
            target,
            displayed,
            in_flight: false,
        }
    }

    pub fn from_goal(goal: &Goal, current_count: u32) -> Self {
        Self::new(goal.id, goal.weekly_target, current_count)
    }

    pub fn goal_id(&self) -> Uuid {
        self.goal_id
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn displayed(&self) -> u32 {
        self.displayed
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn target_met(&self) -> bool {
        self.target > 0 && self.displayed >= self.target
    }

    pub fn can_mark(&self) -> bool {
        !self.in_flight && !self.target_met()
    }

    /// Start a mark: bump the displayed count (never past the target) and
    /// lock the goal. Returns `None` when the mark is suppressed.
    pub fn begin_mark(&mut self) -> Option<PendingMark> {
        if !self.can_mark() {
            return None;
        }

        self.displayed = Cap::for_target(self.target, Cap::UNBOUNDED).next_count(self.displayed);
        self.in_flight = true;
        Some(PendingMark {
            goal_id: self.goal_id,
            optimistic: self.displayed,
        })
    }

    /// Replace the displayed count with the authoritative value.
    pub fn reconcile(&mut self, pending: PendingMark, authoritative: u32) {
        debug_assert_eq!(pending.goal_id, self.goal_id);
        self.displayed = authoritative;
        self.in_flight = false;
    }

    /// Undo the optimistic bump and describe the failure.
    pub fn rollback(&mut self, pending: PendingMark, error: &DomainError) -> FailureNotice {
        debug_assert_eq!(pending.goal_id, self.goal_id);
        self.displayed = self.displayed.saturating_sub(1);
        self.in_flight = false;
        FailureNotice {
            message: format!("Could not record progress: {error}"),
            retryable: error.is_retryable(),
        }
    }

    pub fn settle(&mut self, pending: PendingMark, result: &DomainResult<IncrementOutcome>) -> MarkOutcome {
        match result {
            Ok(outcome) => {
                self.reconcile(pending, outcome.count);
                MarkOutcome::Confirmed {
                    count: outcome.count,
                    path: outcome.path,
                }
            }
            Err(error) => {
                tracing::warn!(goal_id = %self.goal_id, %error, "mark failed, rolling back");
                MarkOutcome::RolledBack(self.rollback(pending, error))
            }
        }
    }
}

/// Per-goal views shared by a presentation layer.
///
/// The lock is only held to begin and settle a mark, never across the
/// increment request itself.
#[derive(Clone, Default)]
pub struct ProgressBoard {
    views: Arc<Mutex<HashMap<Uuid, ProgressView>>>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn track(&self, view: ProgressView) {
        self.views.lock().await.insert(view.goal_id, view);
    }

    pub async fn view(&self, goal_id: Uuid) -> Option<ProgressView> {
        self.views.lock().await.get(&goal_id).cloned()
    }

    /// Run one mark against `goal_id`, issuing `increment` only when the
    /// mark is not suppressed.
    pub async fn mark<F, Fut>(&self, goal_id: Uuid, increment: F) -> DomainResult<MarkOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<IncrementOutcome>>,
    {
        let pending = {
            let mut views = self.views.lock().await;
            let view = views.get_mut(&goal_id).ok_or(DomainError::GoalNotFound(goal_id))?;
            match view.begin_mark() {
                Some(pending) => pending,
                None => return Ok(MarkOutcome::Suppressed),
            }
        };

        let result = increment().await;

        let mut views = self.views.lock().await;
        let view = views.get_mut(&goal_id).ok_or(DomainError::GoalNotFound(goal_id))?;
        Ok(view.settle(pending, &result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ProgressKey, WeekKey};
    use tokio::sync::oneshot;

    fn outcome(goal_id: Uuid, count: u32) -> IncrementOutcome {
        IncrementOutcome {
            key: ProgressKey::new(goal_id, Uuid::new_v4(), WeekKey::current()),
            count,
            path: IncrementPath::Atomic,
        }
    }

    #[test]
    fn test_begin_mark_bumps_and_locks() {
        let mut view = ProgressView::new(Uuid::new_v4(), 3, 1);
        let pending = view.begin_mark().unwrap();

        assert_eq!(pending.optimistic(), 2);
        assert_eq!(view.displayed(), 2);
        assert!(view.in_flight());
        assert!(view.begin_mark().is_none());

        view.reconcile(pending, 2);
        assert!(!view.in_flight());
    }

    #[test]
    fn test_authoritative_value_wins() {
        let goal_id = Uuid::new_v4();
        let mut view = ProgressView::new(goal_id, 5, 0);
        let pending = view.begin_mark().unwrap();

        // Another device incremented concurrently.
        let result = Ok(outcome(goal_id, 3));
        assert_eq!(
            view.settle(pending, &result),
            MarkOutcome::Confirmed { count: 3, path: IncrementPath::Atomic }
        );
        assert_eq!(view.displayed(), 3);
    }

    #[test]
    fn test_rollback_on_failure() {
        let mut view = ProgressView::new(Uuid::new_v4(), 3, 2);
        let pending = view.begin_mark().unwrap();
        assert_eq!(view.displayed(), 3);

        let result = Err(DomainError::StoreUnavailable("offline".to_string()));
        match view.settle(pending, &result) {
            MarkOutcome::RolledBack(notice) => assert!(notice.retryable),
            other => panic!("expected rollback, got {other:?}"),
        }
        assert_eq!(view.displayed(), 2);
        assert!(view.can_mark());
    }

    #[test]
    fn test_target_met_suppresses_mark() {
        let mut view = ProgressView::new(Uuid::new_v4(), 2, 2);
        assert!(view.target_met());
        assert!(view.begin_mark().is_none());
        assert_eq!(view.displayed(), 2);
    }

    #[test]
    fn test_unbounded_goal_keeps_counting() {
        let mut view = ProgressView::new(Uuid::new_v4(), 0, 41);
        let pending = view.begin_mark().unwrap();
        assert_eq!(pending.optimistic(), 42);
    }

    #[test]
    fn test_rollback_bounded_at_zero() {
        let goal_id = Uuid::new_v4();
        let mut view = ProgressView::new(goal_id, 3, 0);
        let pending = view.begin_mark().unwrap();
        // The view was refreshed to 0 by another read while the mark was in flight.
        view.displayed = 0;

        let notice = view.rollback(pending, &DomainError::ValidationFailed("bad".to_string()));
        assert_eq!(view.displayed(), 0);
        assert!(!notice.retryable);
    }

    #[tokio::test]
    async fn test_board_suppresses_while_in_flight() {
        let board = ProgressBoard::new();
        let goal_id = Uuid::new_v4();
        board.track(ProgressView::new(goal_id, 3, 0)).await;

        let (release, gate) = oneshot::channel::<()>();
        let first = {
            let board = board.clone();
            tokio::spawn(async move {
                board
                    .mark(goal_id, || async move {
                        gate.await.ok();
                        Ok(outcome(goal_id, 1))
                    })
                    .await
            })
        };

        // Wait until the first mark has locked the goal.
        while !board.view(goal_id).await.unwrap().in_flight() {
            tokio::task::yield_now().await;
        }

        let second = board
            .mark(goal_id, || async move { Ok(outcome(goal_id, 99)) })
            .await
            .unwrap();
        assert_eq!(second, MarkOutcome::Suppressed);

        release.send(()).unwrap();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, MarkOutcome::Confirmed { count: 1, path: IncrementPath::Atomic });
        assert_eq!(board.view(goal_id).await.unwrap().displayed(), 1);
    }

    #[tokio::test]
    async fn test_board_unknown_goal() {
        let board = ProgressBoard::new();
        let err = board
            .mark(Uuid::new_v4(), || async { Ok(outcome(Uuid::new_v4(), 1)) })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::GoalNotFound(_)));
    }
}
