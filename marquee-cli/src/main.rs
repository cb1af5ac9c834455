//! Marquee CLI - Command-line interface
//!
//! Terminal front-end for searching the movie catalog.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use marquee_core::{CliLogLevel, MarqueeConfig, init_tracing};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Search a movie catalog from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level (full trace always goes to the log file)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Directory for the per-run debug log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    /// Use the built-in demo catalog instead of the network
    #[arg(long, global = true)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    let mut config = MarqueeConfig::from_env();
    if cli.demo {
        config.development.use_demo_data = true;
    }
    config.validate()?;

    commands::handle_command(cli.command, config).await
}
