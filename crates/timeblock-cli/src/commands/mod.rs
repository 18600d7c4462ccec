pub mod config;
pub mod conflict;
pub mod drag;
pub mod grid;
pub mod occurrences;
pub mod recurrence;
pub mod schedule;
pub mod windows;

use std::error::Error;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use timeblock_core::{Config, Task, TaskRecord};

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Config from `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Tasks from a JSON array of host records, optionally limited to one date.
pub fn read_tasks(path: &Path, date: Option<NaiveDate>) -> Result<Vec<Task>, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    let mut tasks = TaskRecord::parse_many(&content)?;
    if let Some(date) = date {
        tasks.retain(|t| t.date == date);
    }
    Ok(tasks)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task, Box<dyn Error>> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| format!("task not found: {id}").into())
}

/// Tasks sharing `task`'s date.
pub fn same_day(tasks: &[Task], task: &Task) -> Vec<Task> {
    tasks.iter().filter(|t| t.date == task.date).cloned().collect()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
