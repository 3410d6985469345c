//! Goal domain model.
//!
//! A goal is a weekly objective with a numeric completion target. Goals are
//! owned either by a single subject or by the whole team.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::progress::Cap;

/// Who a goal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "subject_id")]
pub enum GoalScope {
    /// Goal for one subject (player).
    Subject(Uuid),
    /// Team-wide goal; every member tracks their own counter against it.
    Group,
}

impl GoalScope {
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    pub fn subject_id(&self) -> Option<Uuid> {
        match self {
            Self::Subject(id) => Some(*id),
            Self::Group => None,
        }
    }
}

/// A trackable weekly objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub team_id: Uuid,
    pub scope: GoalScope,
    /// Free-form category label (e.g. "Skill", "Athletic", "Character").
    pub goal_type: String,
    pub title: String,
    pub description: String,
    /// Completions per week. 0 means unbounded.
    pub weekly_target: u32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(team_id: Uuid, title: impl Into<String>, scope: GoalScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            scope,
            goal_type: "Skill".to_string(),
            title: title.into(),
            description: String::new(),
            weekly_target: 1,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_type(mut self, goal_type: impl Into<String>) -> Self {
        self.goal_type = goal_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_weekly_target(mut self, target: u32) -> Self {
        self.weekly_target = target;
        self
    }

    pub fn with_created_by(mut self, created_by: Uuid) -> Self {
        self.created_by = Some(created_by);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.weekly_target == 0
    }

    /// Cap to hand to the counter store.
    pub fn cap(&self, unbounded: Cap) -> Cap {
        Cap::for_target(self.weekly_target, unbounded)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Goal title cannot be empty".to_string());
        }
        if self.goal_type.trim().is_empty() {
            return Err("Goal type cannot be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_builder() {
        let team = Uuid::new_v4();
        let goal = Goal::new(team, "Mobility 2x per week", GoalScope::Group)
            .with_type("Athletic")
            .with_weekly_target(2);

        assert_eq!(goal.team_id, team);
        assert!(goal.scope.is_group());
        assert_eq!(goal.cap(Cap::UNBOUNDED).get(), 2);
        assert!(goal.validate().is_ok());
    }

    #[test]
    fn test_unbounded_goal_cap() {
        let goal = Goal::new(Uuid::new_v4(), "Wall ball", GoalScope::Group).with_weekly_target(0);
        assert!(goal.is_unbounded());
        assert_eq!(goal.cap(Cap::UNBOUNDED), Cap::UNBOUNDED);
    }

    #[test]
    fn test_empty_title_rejected() {
        let goal = Goal::new(Uuid::new_v4(), "  ", GoalScope::Subject(Uuid::new_v4()));
        assert!(goal.validate().is_err());
    }
}
