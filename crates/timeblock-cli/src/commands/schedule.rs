use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use timeblock_core::scheduler::BatchOutcome;
use timeblock_core::{AutoScheduler, OccupancyIndex, PlacementOptions, Task};

use super::{find_task, load_config, print_json, read_tasks, same_day, CmdResult};

#[derive(Args)]
pub struct ScheduleArgs {
    /// JSON file with task records
    #[arg(long)]
    pub tasks: PathBuf,
    /// Task to place
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub task: Option<String>,
    /// Place every unscheduled task instead
    #[arg(long)]
    pub all: bool,
    /// Only consider tasks on this date
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Accept a placement even if it overlaps a committed task
    #[arg(long)]
    pub ignore_overlap: bool,
}

pub fn run(args: ScheduleArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let grid = config.time_grid()?;
    let scheduler = AutoScheduler::with_config(config.scheduling.scheduler_config());
    let tasks = read_tasks(&args.tasks, args.date)?;

    let Some(task_id) = args.task else {
        let mut by_date: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
        for task in tasks {
            by_date.entry(task.date).or_default().push(task);
        }
        let mut outcome = BatchOutcome::default();
        for day in by_date.values() {
            let placed = scheduler.schedule_all(day, &grid);
            outcome.placed.extend(placed.placed);
            outcome.unplaced.extend(placed.unplaced);
        }
        return print_json(&outcome);
    };

    let task = find_task(&tasks, &task_id)?;
    let day = same_day(&tasks, task);
    let occupancy = OccupancyIndex::build_excluding(&grid, &day, Some(&task.id));
    let options = PlacementOptions {
        ignore_overlap: args.ignore_overlap,
    };
    let command = scheduler.schedule_with(task, &grid, &occupancy, &day, options)?;
    print_json(&command)
}
