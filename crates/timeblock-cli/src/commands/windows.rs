use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use timeblock_core::scheduler::find_windows;
use timeblock_core::OccupancyIndex;

use super::{load_config, print_json, read_tasks, CmdResult};

#[derive(Args)]
pub struct WindowsArgs {
    /// JSON file with the day's task records
    #[arg(long)]
    pub tasks: PathBuf,
    /// Day to search
    #[arg(long)]
    pub date: NaiveDate,
    /// Window length in minutes (defaults to scheduling.default_duration_minutes)
    #[arg(long)]
    pub duration: Option<u32>,
    /// Leave this task out of the occupancy
    #[arg(long)]
    pub exclude: Option<String>,
}

pub fn run(args: WindowsArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let grid = config.time_grid()?;
    let tasks = read_tasks(&args.tasks, Some(args.date))?;
    let occupancy = OccupancyIndex::build_excluding(&grid, &tasks, args.exclude.as_deref());

    let duration = args
        .duration
        .unwrap_or(config.scheduling.default_duration_minutes);
    let windows = find_windows(&occupancy, duration);
    tracing::debug!(count = windows.len(), duration, "found windows");
    print_json(&windows)
}
