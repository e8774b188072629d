//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "market-digest")]
#[command(author, version, about = "Daily technical-signal digest for equities and crypto")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to the config file's logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one CSV price history
    Evaluate(EvaluateArgs),
    /// Fetch the watchlist, classify it and deliver digests
    Run(RunArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Data file (CSV with Date, Open, High, Low, Close, Volume)
    #[arg(long)]
    pub data: PathBuf,

    /// Symbol label (defaults to the file name)
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Log digests instead of writing them to the outbox
    #[arg(long)]
    pub dry_run: bool,
}
