use std::path::{Path, PathBuf};

use clap::Args;
use timeblock_core::DragRescheduler;

use super::{find_task, load_config, print_json, read_tasks, same_day, CmdResult};

#[derive(Args)]
pub struct DragArgs {
    /// JSON file with task records
    #[arg(long)]
    pub tasks: PathBuf,
    /// Task being dragged
    #[arg(long)]
    pub task: String,
    /// Vertical pointer offset in pixels (negative moves earlier)
    #[arg(long, allow_hyphen_values = true)]
    pub offset: f64,
    /// Timeline scale (defaults to drag.pixels_per_minute)
    #[arg(long)]
    pub ppm: Option<f64>,
    /// Snap resolution in minutes (defaults to drag.snap_minutes)
    #[arg(long)]
    pub snap: Option<u32>,
}

pub fn run(args: DragArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let bounds = config.drag.bounds()?;
    let rescheduler = match args.snap {
        Some(snap) => DragRescheduler::new(snap)?,
        None => config.drag.rescheduler()?,
    };

    let tasks = read_tasks(&args.tasks, None)?;
    let task = find_task(&tasks, &args.task)?;
    let existing = same_day(&tasks, task);
    let ppm = args.ppm.unwrap_or(config.drag.pixels_per_minute);

    let command = rescheduler.reschedule(task, args.offset, ppm, &bounds, &existing)?;
    print_json(&command)
}
