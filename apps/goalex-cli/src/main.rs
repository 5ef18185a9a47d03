//! # goalex
//!
//! Command-line front end for goal generation:
//! - `goalex goals` — ask a model for analytical goals about a dataset summary
//! - `goalex prompt` — print the messages that would be sent, without calling a model

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goalex_core::config::CONFIG_FILE;
use goalex_core::GoalexConfig;

/// Generate analytical goals about a dataset with a language model.
#[derive(Parser)]
#[command(name = "goalex", version, about)]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate goals from a dataset summary.
    Goals(commands::goals::GoalsArgs),
    /// Print the assembled prompt as JSON (no model call).
    Prompt(commands::prompt::PromptArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only goals and retry notices.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("goalex_core=info".parse()?)
                .add_directive("goalex_openai=info".parse()?)
                .add_directive("goalex=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = GoalexConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match &cli.command {
        Commands::Goals(args) => commands::goals::execute(args, &config),
        Commands::Prompt(args) => commands::prompt::execute(args, &config),
    }
}
