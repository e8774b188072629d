//! Market digest CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use digest_config::load_config;
use digest_report::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config file may be missing for `evaluate`; errors surface per command
    let loaded = load_config(&cli.config);

    // Setup logging: CLI flags win over the config file
    let logging = loaded.as_ref().ok().map(|c| c.logging.clone()).unwrap_or_default();
    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace",
        Some(cli::LogLevel::Debug) => "debug",
        Some(cli::LogLevel::Info) => "info",
        Some(cli::LogLevel::Warn) => "warn",
        Some(cli::LogLevel::Error) => "error",
        None => logging.level.as_str(),
    };
    let _guard = setup_logging(
        log_level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref().map(Path::new),
    );

    // Execute command
    match cli.command {
        Commands::Evaluate(args) => cli::commands::evaluate::run(args, loaded.ok()).await,
        Commands::Run(args) => cli::commands::run::run(args, &cli.config, loaded).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded).await,
    }
}
