//! Weekly progress CLI commands.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{format_progress, output, CommandOutput};
use crate::domain::models::{IncrementPath, WeekKey};
use crate::domain::ports::IdentityProvider;
use crate::services::{MarkOutcome, ProgressView};

#[derive(Args, Debug)]
pub struct ProgressArgs {
    #[command(subcommand)]
    pub command: ProgressCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    /// Record one completion of a goal for the current week
    Mark {
        /// Goal ID
        goal_id: Uuid,
        /// Subject to credit (defaults to the configured identity)
        #[arg(long)]
        subject: Option<Uuid>,
    },
    /// Show a subject's count for a goal
    Show {
        /// Goal ID
        goal_id: Uuid,
        #[arg(long)]
        subject: Option<Uuid>,
        /// Any date inside the week to show (YYYY-MM-DD); defaults to this week
        #[arg(long)]
        week: Option<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct MarkOutput {
    pub goal_id: String,
    pub subject_id: String,
    pub week: String,
    pub recorded: bool,
    pub completed_count: u32,
    pub weekly_target: u32,
    pub path: Option<IncrementPath>,
    pub message: String,
}

impl CommandOutput for MarkOutput {
    fn to_human(&self) -> String {
        format!(
            "{} ({} this week)",
            self.message,
            format_progress(self.completed_count, self.weekly_target)
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ProgressShowOutput {
    pub goal_id: String,
    pub title: String,
    pub subject_id: String,
    pub week: String,
    pub completed_count: u32,
    pub weekly_target: u32,
    pub target_met: bool,
}

impl CommandOutput for ProgressShowOutput {
    fn to_human(&self) -> String {
        let status = if self.target_met { " - target met" } else { "" };
        format!(
            "{}: {} for week of {}{status}",
            self.title,
            format_progress(self.completed_count, self.weekly_target),
            self.week
        )
    }
}

pub async fn execute(args: ProgressArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    match args.command {
        ProgressCommands::Mark { goal_id, subject } => mark(ctx, goal_id, subject, json_mode).await,
        ProgressCommands::Show { goal_id, subject, week } => {
            let subject_id = ctx.identity(subject).current_subject()?;
            let week = match week {
                Some(raw) => WeekKey::containing(
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?,
                ),
                None => WeekKey::current(),
            };

            let (goal, count) = ctx
                .progress_service()?
                .goal_progress(goal_id, subject_id, week)
                .await?;
            let view = ProgressView::from_goal(&goal, count);

            let out = ProgressShowOutput {
                goal_id: goal.id.to_string(),
                title: goal.title.clone(),
                subject_id: subject_id.to_string(),
                week: week.to_string(),
                completed_count: count,
                weekly_target: goal.weekly_target,
                target_met: view.target_met(),
            };
            output(&out, json_mode);
            Ok(())
        }
    }
}

async fn mark(ctx: &AppContext, goal_id: Uuid, subject: Option<Uuid>, json_mode: bool) -> Result<()> {
    let subject_id = ctx.identity(subject).current_subject()?;
    let service = ctx.progress_service()?;

    let now = Local::now();
    let week = WeekKey::resolve(&now);
    let (goal, count) = service.goal_progress(goal_id, subject_id, week).await?;
    let mut view = ProgressView::from_goal(&goal, count);

    let base = |recorded: bool, completed_count: u32, path: Option<IncrementPath>, message: String| MarkOutput {
        goal_id: goal.id.to_string(),
        subject_id: subject_id.to_string(),
        week: week.to_string(),
        recorded,
        completed_count,
        weekly_target: goal.weekly_target,
        path,
        message,
    };

    let Some(pending) = view.begin_mark() else {
        output(
            &base(false, view.displayed(), None, format!("Weekly target already met for '{}'", goal.title)),
            json_mode,
        );
        return Ok(());
    };

    let result = service.request_increment(goal.id, subject_id, &now).await;
    match view.settle(pending, &result) {
        MarkOutcome::Confirmed { count, path } => {
            output(
                &base(true, count, Some(path), format!("Marked '{}'", goal.title)),
                json_mode,
            );
            Ok(())
        }
        MarkOutcome::RolledBack(notice) => {
            let hint = if notice.retryable { " (try again later)" } else { "" };
            Err(anyhow!("{}{hint}", notice.message))
        }
        MarkOutcome::Suppressed => Ok(()),
    }
}
