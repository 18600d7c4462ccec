use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "timeblock-cli", version, about = "Timeblock scheduling engine CLI")]
struct Cli {
    /// Use this config file instead of ~/.config/timeblock/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the day grid
    Grid(commands::grid::GridArgs),
    /// List free windows for a duration
    Windows(commands::windows::WindowsArgs),
    /// Auto-place one task, or every unscheduled task
    Schedule(commands::schedule::ScheduleArgs),
    /// Check an interval against committed tasks
    Conflict(commands::conflict::ConflictArgs),
    /// Validate a drag of a task by a pixel offset
    Drag(commands::drag::DragArgs),
    /// Recurring series edits
    Recurrence {
        #[command(subcommand)]
        action: commands::recurrence::RecurrenceAction,
    },
    /// Materialize a store's tasks for one date
    Occurrences(commands::occurrences::OccurrencesArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Grid(args) => commands::grid::run(args, config),
        Commands::Windows(args) => commands::windows::run(args, config),
        Commands::Schedule(args) => commands::schedule::run(args, config),
        Commands::Conflict(args) => commands::conflict::run(args),
        Commands::Drag(args) => commands::drag::run(args, config),
        Commands::Recurrence { action } => commands::recurrence::run(action),
        Commands::Occurrences(args) => commands::occurrences::run(args),
        Commands::Config { action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
