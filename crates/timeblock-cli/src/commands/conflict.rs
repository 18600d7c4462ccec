use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use timeblock_core::{all_conflicts, find_conflict, overlapping_pairs, Interval, Task, TimeOfDay};

use super::{print_json, read_tasks, CmdResult};

#[derive(Args)]
pub struct ConflictArgs {
    /// JSON file with task records
    #[arg(long)]
    pub tasks: PathBuf,
    /// Date the candidate falls on (with --audit, limits the audit to it)
    #[arg(long, required_unless_present = "audit")]
    pub date: Option<NaiveDate>,
    /// Candidate start (HH:MM)
    #[arg(long, required_unless_present = "audit")]
    pub start: Option<TimeOfDay>,
    /// Candidate end (HH:MM); earlier than start means next day
    #[arg(long, required_unless_present = "audit")]
    pub end: Option<TimeOfDay>,
    /// Task id to ignore, usually the one being moved
    #[arg(long)]
    pub exclude: Option<String>,
    /// Report every conflicting task, not just the first
    #[arg(long)]
    pub all: bool,
    /// List committed tasks that already overlap each other
    #[arg(long, conflicts_with_all = ["start", "end", "all"])]
    pub audit: bool,
}

pub fn run(args: ConflictArgs) -> CmdResult {
    let tasks = read_tasks(&args.tasks, args.date)?;
    if args.audit {
        let mut by_date: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
        for task in tasks {
            by_date.entry(task.date).or_default().push(task);
        }
        let pairs: Vec<_> = by_date.values().flat_map(|day| overlapping_pairs(day)).collect();
        return print_json(&pairs);
    }

    let (Some(start), Some(end)) = (args.start, args.end) else {
        return Err("--start and --end are required".into());
    };
    let candidate = Interval::new(start, end)?;
    let exclude = args.exclude.as_deref();
    if args.all {
        print_json(&all_conflicts(&candidate, &tasks, exclude))
    } else {
        print_json(&find_conflict(&candidate, &tasks, exclude))
    }
}
