//! Implementation of the `tallyboard seed` command.

use anyhow::Result;
use clap::Args;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Goal, GoalScope};

pub const SAMPLE_TEAM: Uuid = Uuid::from_u128(0x1111_1111_1111_1111_1111_1111_1111_1111);
pub const SAMPLE_PLAYERS: [Uuid; 3] = [
    Uuid::from_u128(0x2222_2222_2222_2222_2222_2222_2222_2222),
    Uuid::from_u128(0x3333_3333_3333_3333_3333_3333_3333_3333),
    Uuid::from_u128(0x4444_4444_4444_4444_4444_4444_4444_4444),
];

#[derive(Args, Debug)]
pub struct SeedArgs {}

#[derive(Debug, serde::Serialize)]
pub struct SeedOutput {
    pub team_id: String,
    pub inserted: usize,
    pub skipped: usize,
}

impl CommandOutput for SeedOutput {
    fn to_human(&self) -> String {
        format!(
            "Seeded team {}: {} goal(s) inserted, {} already present",
            self.team_id, self.inserted, self.skipped
        )
    }
}

/// Sample goals with stable ids so reseeding is a no-op.
pub fn sample_goals() -> Vec<Goal> {
    let goal = |id: u128, title: &str, scope: GoalScope, goal_type: &str, target: u32, description: &str| {
        let mut goal = Goal::new(SAMPLE_TEAM, title, scope)
            .with_type(goal_type)
            .with_weekly_target(target)
            .with_description(description);
        goal.id = Uuid::from_u128(id);
        goal
    };

    vec![
        goal(
            0x5555_5555_5555_5555_5555_5555_5555_5555,
            "Improve exit velo to 70+ mph",
            GoalScope::Subject(SAMPLE_PLAYERS[0]),
            "Skill",
            3,
            "Work on tee and front toss",
        ),
        goal(
            0x6666_6666_6666_6666_6666_6666_6666_6666,
            "Mobility 2x per week",
            GoalScope::Subject(SAMPLE_PLAYERS[1]),
            "Athletic",
            2,
            "Follow mobility routine",
        ),
        goal(
            0x7777_7777_7777_7777_7777_7777_7777_7777,
            "Wall Ball 100/day",
            GoalScope::Group,
            "Character",
            7,
            "Daily wall ball challenge",
        ),
    ]
}

pub async fn execute(_args: SeedArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.goal_service();
    let mut inserted = 0;
    let mut skipped = 0;

    for goal in sample_goals() {
        if service.import_goal(&goal).await? {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }

    tracing::info!(inserted, skipped, "sample goals seeded");
    output(
        &SeedOutput {
            team_id: SAMPLE_TEAM.to_string(),
            inserted,
            skipped,
        },
        json_mode,
    );
    Ok(())
}
