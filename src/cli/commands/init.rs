//! Implementation of the `tallyboard init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml with defaults
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub config_path: PathBuf,
    pub config_written: bool,
    pub database_path: String,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.config_written {
            lines.push(format!("Wrote default configuration to {}", self.config_path.display()));
        } else {
            lines.push(format!("Keeping existing configuration at {}", self.config_path.display()));
        }
        lines.push(format!("Database ready at {}", self.database_path));
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, config: Config, json_mode: bool) -> Result<()> {
    let project_dir = PathBuf::from(".tallyboard");
    let config_path = project_dir.join("config.yaml");

    tokio::fs::create_dir_all(&project_dir)
        .await
        .context("Failed to create .tallyboard directory")?;

    let config_written = args.force || !config_path.exists();
    if config_written {
        let yaml = serde_yaml::to_string(&Config::default()).context("Failed to render default config")?;
        tokio::fs::write(&config_path, yaml)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let ctx = AppContext::open(config).await?;
    crate::adapters::sqlite::verify_connection(&ctx.pool).await?;

    let out = InitOutput {
        success: true,
        config_path,
        config_written,
        database_path: ctx.config.database.path.clone(),
    };
    output(&out, json_mode);
    Ok(())
}
