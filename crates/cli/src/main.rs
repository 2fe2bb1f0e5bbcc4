//! toolloop CLI: the main entry point.
//!
//! Commands:
//! - `react`: Answer a question with the ReAct loop
//! - `memory`: Same loop, with long-term facts and step history as context
//! - `plan`: Plan a goal as JSON, then execute every step
//! - `tools`: List the registered tools
//! - `config`: Show the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "toolloop",
    about = "toolloop: tool-augmented reasoning agents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.toolloop/config.toml)
    #[arg(long, global = true, env = "TOOLLOOP_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question with the Thought/Action/Observation loop
    React {
        question: String,

        /// Override the configured step bound (at least 1)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_steps: Option<u32>,
    },

    /// Answer a question using long-term facts and step history
    Memory {
        question: String,

        /// Add a long-term fact (repeatable)
        #[arg(long = "fact")]
        facts: Vec<String>,

        /// Override the configured step bound (at least 1)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_steps: Option<u32>,
    },

    /// Plan a goal, then execute the plan
    Plan { goal: String },

    /// List available tools
    Tools,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::React {
            question,
            max_steps,
        } => commands::react::run(&config, &question, max_steps).await?,
        Commands::Memory {
            question,
            facts,
            max_steps,
        } => commands::memory::run(&config, &question, facts, max_steps).await?,
        Commands::Plan { goal } => commands::plan::run(&config, &goal).await?,
        Commands::Tools => commands::tools::run(&config)?,
        Commands::Config => commands::config_cmd::run(&config, cli.config.as_deref())?,
    }

    Ok(())
}
