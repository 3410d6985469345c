//! Progress counter domain model.
//!
//! A progress counter tallies how many times a goal's activity was completed
//! by one subject during one week. Counters are created lazily on the first
//! increment, only ever move upward, and saturate at the goal's weekly cap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::week::WeekKey;
use crate::domain::errors::{DomainError, DomainResult};

/// Cap used when a goal has no weekly target (target of 0 or absent).
pub const UNBOUNDED_CAP: u32 = 9_999;

/// Upper bound for a counter. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cap(u32);

impl Cap {
    pub const UNBOUNDED: Self = Self(UNBOUNDED_CAP);

    pub fn new(value: u32) -> DomainResult<Self> {
        if value == 0 {
            return Err(DomainError::ValidationFailed(
                "Counter cap must be a positive integer".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Cap for a goal's weekly target. A target of 0 means unbounded and maps
    /// to `unbounded`, never to a cap of zero.
    pub fn for_target(weekly_target: u32, unbounded: Self) -> Self {
        if weekly_target == 0 {
            unbounded
        } else {
            Self(weekly_target)
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// `min(prior + 1, cap)`. At the cap this returns the cap unchanged.
    pub fn next_count(self, prior: u32) -> u32 {
        prior.saturating_add(1).min(self.0)
    }
}

impl fmt::Display for Cap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical identity of a counter: (goal, subject, week).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub goal_id: Uuid,
    pub subject_id: Uuid,
    pub week: WeekKey,
}

impl ProgressKey {
    pub fn new(goal_id: Uuid, subject_id: Uuid, week: WeekKey) -> Self {
        Self {
            goal_id,
            subject_id,
            week,
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "goal={} subject={} week={}", self.goal_id, self.subject_id, self.week)
    }
}

/// A stored counter row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressCounter {
    /// Row identity, distinct from the logical key.
    pub id: Uuid,
    pub key: ProgressKey,
    pub completed_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl ProgressCounter {
    /// A freshly created counter holding its first completion.
    pub fn first(key: ProgressKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            completed_count: 1,
            updated_at: Utc::now(),
        }
    }
}

/// Result of asking the atomic increment procedure to run.
///
/// Business failures are reported through `Err` instead, so that only a
/// genuinely unreachable procedure can send a request down the fallback path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomicAttempt {
    /// The procedure ran; carries the new count.
    Applied(u32),
    /// The procedure could not run (not installed, infrastructure failure).
    Unavailable(String),
}

/// Which route produced an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncrementPath {
    /// Single round trip through the atomic procedure.
    Atomic,
    /// Client-side read-modify-write.
    Fallback,
    /// Fallback lost the first-insert race and bounced once through the
    /// atomic procedure.
    FallbackRaceRetry,
}

impl IncrementPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Fallback => "fallback",
            Self::FallbackRaceRetry => "fallback_race_retry",
        }
    }
}

/// Authoritative outcome of one increment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementOutcome {
    pub key: ProgressKey,
    pub count: u32,
    pub path: IncrementPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_rejects_zero() {
        assert!(matches!(Cap::new(0), Err(DomainError::ValidationFailed(_))));
        assert_eq!(Cap::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_zero_target_is_unbounded_not_zero() {
        assert_eq!(Cap::for_target(0, Cap::UNBOUNDED), Cap::UNBOUNDED);
        assert_eq!(Cap::for_target(5, Cap::UNBOUNDED).get(), 5);
    }

    #[test]
    fn test_next_count_saturates() {
        let cap = Cap::new(3).unwrap();
        assert_eq!(cap.next_count(0), 1);
        assert_eq!(cap.next_count(2), 3);
        assert_eq!(cap.next_count(3), 3);
        assert_eq!(Cap::UNBOUNDED.next_count(u32::MAX), UNBOUNDED_CAP);
    }
}
