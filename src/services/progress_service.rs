//! Weekly progress increments.
//!
//! Every increment first tries the atomic procedure. Only when that
//! procedure reports itself unavailable does the read-modify-write fallback
//! run. The fallback is not linearizable: two fallbacks racing on an existing
//! row can both read the same count and one increment is lost. The single
//! case it does resolve is the first-insert race, by bouncing exactly once
//! through the atomic procedure.

use chrono::{DateTime, TimeZone};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AtomicAttempt, Cap, Goal, IncrementOutcome, IncrementPath, ProgressCounter, ProgressKey, WeekKey,
};
use crate::domain::ports::{AtomicIncrement, GoalRepository, ProgressRepository};

pub struct ProgressService<S, G>
where
    S: ProgressRepository + AtomicIncrement,
    G: GoalRepository,
{
    store: Arc<S>,
    goals: Arc<G>,
    unbounded_cap: Cap,
}

impl<S, G> ProgressService<S, G>
where
    S: ProgressRepository + AtomicIncrement,
    G: GoalRepository,
{
    pub fn new(store: Arc<S>, goals: Arc<G>) -> Self {
        Self {
            store,
            goals,
            unbounded_cap: Cap::UNBOUNDED,
        }
    }

    /// Cap substituted for goals without a weekly target.
    pub fn with_unbounded_cap(mut self, cap: Cap) -> Self {
        self.unbounded_cap = cap;
        self
    }

    /// Record one completion of `goal_id` by `subject_id` in the week
    /// containing `at`.
    ///
    /// Not idempotent: sending the same request twice counts twice.
    pub async fn request_increment<Tz>(
        &self,
        goal_id: Uuid,
        subject_id: Uuid,
        at: &DateTime<Tz>,
    ) -> DomainResult<IncrementOutcome>
    where
        Tz: TimeZone,
    {
        let week = WeekKey::resolve(at);
        let goal = self.load_goal(goal_id).await?;
        let key = ProgressKey::new(goal.id, subject_id, week);
        self.increment(key, goal.cap(self.unbounded_cap)).await
    }

    /// Increment-and-cap for one counter: `min(prior + 1, cap)`.
    #[instrument(skip_all, fields(key = %key, cap = %cap))]
    pub async fn increment(&self, key: ProgressKey, cap: Cap) -> DomainResult<IncrementOutcome> {
        validate_key(&key)?;

        debug!("attempting atomic increment");
        match self.store.increment_atomic(&key, cap).await? {
            AtomicAttempt::Applied(count) => {
                info!(count, "progress incremented");
                Ok(IncrementOutcome { key, count, path: IncrementPath::Atomic })
            }
            AtomicAttempt::Unavailable(reason) => {
                warn!(%reason, "atomic increment unavailable, using fallback");
                self.increment_fallback(key, cap).await
            }
        }
    }

    async fn increment_fallback(&self, key: ProgressKey, cap: Cap) -> DomainResult<IncrementOutcome> {
        if let Some(existing) = self.store.find_by_key(&key).await? {
            let next = cap.next_count(existing.completed_count);
            let updated = self.store.update_count(existing.id, next).await?;
            info!(count = updated.completed_count, "progress incremented via fallback");
            return Ok(IncrementOutcome {
                key,
                count: updated.completed_count,
                path: IncrementPath::Fallback,
            });
        }

        let first = ProgressCounter::first(key);
        match self.store.insert(&first).await {
            Ok(()) => {
                info!(count = first.completed_count, "progress counter created via fallback");
                Ok(IncrementOutcome {
                    key,
                    count: first.completed_count,
                    path: IncrementPath::Fallback,
                })
            }
            Err(DomainError::DuplicateCounter(_)) => {
                warn!("counter created concurrently, retrying once through atomic increment");
                match self.store.increment_atomic(&key, cap).await? {
                    AtomicAttempt::Applied(count) => {
                        info!(count, "progress incremented after race retry");
                        Ok(IncrementOutcome { key, count, path: IncrementPath::FallbackRaceRetry })
                    }
                    AtomicAttempt::Unavailable(reason) => Err(DomainError::StoreUnavailable(format!(
                        "race retry could not reach atomic increment: {reason}"
                    ))),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Authoritative count for a key; 0 when the counter was never created.
    pub async fn current_count(&self, key: &ProgressKey) -> DomainResult<u32> {
        validate_key(key)?;
        Ok(self
            .store
            .find_by_key(key)
            .await?
            .map_or(0, |counter| counter.completed_count))
    }

    /// A goal together with a subject's count for `week`.
    pub async fn goal_progress(
        &self,
        goal_id: Uuid,
        subject_id: Uuid,
        week: WeekKey,
    ) -> DomainResult<(Goal, u32)> {
        let goal = self.load_goal(goal_id).await?;
        let count = self
            .current_count(&ProgressKey::new(goal.id, subject_id, week))
            .await?;
        Ok((goal, count))
    }

    /// Goals owned by a subject, each with that subject's count for `week`.
    pub async fn subject_goals_with_progress(
        &self,
        subject_id: Uuid,
        week: WeekKey,
    ) -> DomainResult<Vec<(Goal, u32)>> {
        let goals = self.goals.list_for_subject(subject_id).await?;
        let keys: Vec<ProgressKey> = goals
            .iter()
            .map(|goal| ProgressKey::new(goal.id, subject_id, week))
            .collect();
        let counts = try_join_all(keys.iter().map(|key| self.current_count(key))).await?;
        Ok(goals.into_iter().zip(counts).collect())
    }

    async fn load_goal(&self, goal_id: Uuid) -> DomainResult<Goal> {
        self.goals
            .get(goal_id)
            .await?
            .ok_or(DomainError::GoalNotFound(goal_id))
    }
}

fn validate_key(key: &ProgressKey) -> DomainResult<()> {
    if key.goal_id.is_nil() {
        return Err(DomainError::ValidationFailed("Goal id cannot be nil".to_string()));
    }
    if key.subject_id.is_nil() {
        return Err(DomainError::ValidationFailed("Subject id cannot be nil".to_string()));
    }
    Ok(())
}
