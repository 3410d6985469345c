//! Tallyboard CLI entry point.

use anyhow::Context;
use clap::Parser;

use tallyboard::cli::{commands, AppContext, Cli, Commands};
use tallyboard::infrastructure::config::ConfigLoader;
use tallyboard::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config, cli.json).await {
        tallyboard::cli::handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<std::path::PathBuf>, json: bool) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match command {
        Commands::Init(args) => commands::init::execute(args, config, json).await,
        Commands::Week(args) => commands::week::execute(args, json),
        Commands::Goal(args) => {
            let ctx = AppContext::open(config).await?;
            commands::goal::execute(args, &ctx, json).await
        }
        Commands::Progress(args) => {
            let ctx = AppContext::open(config).await?;
            commands::progress::execute(args, &ctx, json).await
        }
        Commands::Seed(args) => {
            let ctx = AppContext::open(config).await?;
            commands::seed::execute(args, &ctx, json).await
        }
    }
}
