//! stepwise CLI - run instrumented algorithms in the terminal.

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stepwise_engine::observability::{TracingConfig, TracingGuard, init_tracing};

/// stepwise - step-by-step algorithm visualization engine.
#[derive(Parser)]
#[command(name = "stepwise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an algorithm and print its checkpoints
    Run(commands::run::RunArgs),

    /// Validate a request file without running it
    Validate {
        /// Path to the request YAML file
        file: String,
    },

    /// List registered algorithms
    List {
        /// Only show one family (e.g. sorting, tree)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show version information
    Version,
}

fn setup_logging(verbosity: u8) -> Result<TracingGuard> {
    init_tracing(TracingConfig::for_verbosity(verbosity).with_env_overrides())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _tracing_guard = setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Validate { file } => commands::validate::run(&file),
        Commands::List { category } => commands::list::run(category.as_deref()),
        Commands::Version => commands::version::run(),
    }
}
