//! Goal CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{format_progress, list_table, output, truncate, CommandOutput};
use crate::domain::models::{Goal, GoalScope, WeekKey};
use crate::domain::ports::IdentityProvider;
use crate::services::NewGoal;

#[derive(Args, Debug)]
pub struct GoalArgs {
    #[command(subcommand)]
    pub command: GoalCommands,
}

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Create a new goal
    Create {
        /// Team the goal belongs to
        #[arg(long)]
        team: Uuid,
        /// Goal title
        #[arg(long)]
        title: String,
        /// Category label (Skill, Athletic, Character, ...)
        #[arg(long = "type", default_value = "Skill")]
        goal_type: String,
        /// Completions per week; 0 means unbounded
        #[arg(long, default_value_t = 1)]
        target: u32,
        /// Owning subject (defaults to the acting subject)
        #[arg(long, conflicts_with = "team_goal")]
        subject: Option<Uuid>,
        /// Make this a team-wide goal
        #[arg(long)]
        team_goal: bool,
        /// Goal description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show a single goal
    Show {
        /// Goal ID
        id: Uuid,
    },
    /// List goals for a team or a subject
    List {
        /// List every goal of this team
        #[arg(long, conflicts_with = "subject")]
        team: Option<Uuid>,
        /// List a subject's goals with this week's progress
        #[arg(long)]
        subject: Option<Uuid>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct GoalOutput {
    pub id: String,
    pub team_id: String,
    pub subject_id: Option<String>,
    pub is_team_goal: bool,
    pub goal_type: String,
    pub title: String,
    pub weekly_target: u32,
    pub completed_this_week: Option<u32>,
}

impl GoalOutput {
    fn new(goal: &Goal, completed_this_week: Option<u32>) -> Self {
        Self {
            id: goal.id.to_string(),
            team_id: goal.team_id.to_string(),
            subject_id: goal.scope.subject_id().map(|id| id.to_string()),
            is_team_goal: goal.scope.is_group(),
            goal_type: goal.goal_type.clone(),
            title: goal.title.clone(),
            weekly_target: goal.weekly_target,
            completed_this_week,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct GoalListOutput {
    pub week: Option<String>,
    pub goals: Vec<GoalOutput>,
    pub total: usize,
}

impl CommandOutput for GoalListOutput {
    fn to_human(&self) -> String {
        if self.goals.is_empty() {
            return "No goals found.".to_string();
        }

        let mut table = list_table(&["id", "type", "title", "scope", "progress"]);
        for goal in &self.goals {
            let progress = goal.completed_this_week.map_or_else(
                || format!("target {}", goal.weekly_target),
                |done| format_progress(done, goal.weekly_target),
            );
            table.add_row(vec![
                goal.id.clone(),
                goal.goal_type.clone(),
                truncate(&goal.title, 40),
                if goal.is_team_goal { "team".to_string() } else { "player".to_string() },
                progress,
            ]);
        }

        let heading = match &self.week {
            Some(week) => format!("{} goal(s), week of {week}:", self.total),
            None => format!("{} goal(s):", self.total),
        };
        format!("{heading}\n{table}")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct GoalActionOutput {
    pub success: bool,
    pub message: String,
    pub goal: GoalOutput,
}

impl CommandOutput for GoalActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct GoalDetailOutput {
    #[serde(flatten)]
    pub goal: GoalOutput,
    pub description: String,
    pub created_by: Option<String>,
    pub created_at: String,
}

impl From<&Goal> for GoalDetailOutput {
    fn from(goal: &Goal) -> Self {
        Self {
            goal: GoalOutput::new(goal, None),
            description: goal.description.clone(),
            created_by: goal.created_by.map(|id| id.to_string()),
            created_at: goal.created_at.to_rfc3339(),
        }
    }
}

impl CommandOutput for GoalDetailOutput {
    fn to_human(&self) -> String {
        let owner = self
            .goal
            .subject_id
            .as_deref()
            .map_or_else(|| "whole team".to_string(), |id| format!("player {id}"));
        let target = if self.goal.weekly_target == 0 {
            "unbounded".to_string()
        } else {
            format!("{} per week", self.goal.weekly_target)
        };

        let mut lines = vec![
            format!("Goal:   {}", self.goal.id),
            format!("Title:  {}", self.goal.title),
            format!("Type:   {}", self.goal.goal_type),
            format!("Team:   {}", self.goal.team_id),
            format!("Owner:  {owner}"),
            format!("Target: {target}"),
        ];
        if !self.description.is_empty() {
            lines.push(format!("\n{}", self.description));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: GoalArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    match args.command {
        GoalCommands::Create { team, title, goal_type, target, subject, team_goal, description } => {
            let identity = ctx.identity(subject);
            let scope = if team_goal {
                GoalScope::Group
            } else {
                GoalScope::Subject(identity.current_subject()?)
            };

            let goal = ctx
                .goal_service()
                .create_goal(NewGoal {
                    team_id: team,
                    scope,
                    goal_type,
                    title,
                    description: description.unwrap_or_default(),
                    weekly_target: target,
                    created_by: ctx.identity(None).current_subject().ok(),
                })
                .await?;

            let out = GoalActionOutput {
                success: true,
                message: format!("Goal created: {}", goal.id),
                goal: GoalOutput::new(&goal, None),
            };
            output(&out, json_mode);
        }

        GoalCommands::Show { id } => {
            let goal = ctx
                .goal_service()
                .get_goal(id)
                .await?
                .with_context(|| format!("Goal {id} not found"))?;
            output(&GoalDetailOutput::from(&goal), json_mode);
        }

        GoalCommands::List { team, subject } => {
            let out = match (team, subject) {
                (Some(team_id), _) => {
                    let goals = ctx.goal_service().list_team_goals(team_id).await?;
                    GoalListOutput {
                        week: None,
                        total: goals.len(),
                        goals: goals.iter().map(|g| GoalOutput::new(g, None)).collect(),
                    }
                }
                (None, subject) => {
                    let subject_id = ctx.identity(subject).current_subject()?;
                    let week = WeekKey::current();
                    let goals = ctx
                        .progress_service()?
                        .subject_goals_with_progress(subject_id, week)
                        .await?;
                    GoalListOutput {
                        week: Some(week.to_string()),
                        total: goals.len(),
                        goals: goals
                            .iter()
                            .map(|(goal, count)| GoalOutput::new(goal, Some(*count)))
                            .collect(),
                    }
                }
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
