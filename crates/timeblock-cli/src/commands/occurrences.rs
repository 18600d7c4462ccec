use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use timeblock_core::{MemoryStore, TaskRecord};

use super::{print_json, read_json, CmdResult};

#[derive(Args)]
pub struct OccurrencesArgs {
    /// JSON store snapshot ({tasks, series, exceptions})
    #[arg(long)]
    pub store: PathBuf,
    /// Date to materialize
    #[arg(long)]
    pub date: NaiveDate,
}

pub fn run(args: OccurrencesArgs) -> CmdResult {
    let store: MemoryStore = read_json(&args.store)?;
    let records: Vec<TaskRecord> = store.tasks_on(args.date).iter().map(TaskRecord::from).collect();
    print_json(&records)
}
