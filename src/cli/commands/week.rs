//! Implementation of the `tallyboard week` command.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::WeekKey;

#[derive(Args, Debug)]
pub struct WeekArgs {
    /// Calendar date (YYYY-MM-DD); defaults to today in local time
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct WeekOutput {
    pub date: String,
    pub week_key: String,
}

impl CommandOutput for WeekOutput {
    fn to_human(&self) -> String {
        self.week_key.clone()
    }
}

pub fn execute(args: WeekArgs, json_mode: bool) -> Result<()> {
    let date = match args.date {
        Some(ref raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?,
        None => chrono::Local::now().date_naive(),
    };

    let out = WeekOutput {
        date: date.format("%Y-%m-%d").to_string(),
        week_key: WeekKey::containing(date).to_string(),
    };
    output(&out, json_mode);
    Ok(())
}
