//! Placement commands handed to the host store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::Interval;

/// A validated placement for one task.
///
/// `previous` is the interval the engine saw when it computed the placement
/// (`None` for a task that was unscheduled). Stores compare it against their
/// current state and reject the command if the task moved in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCommand {
    pub task_id: String,
    pub interval: Interval,
    #[serde(default)]
    pub previous: Option<Interval>,
}

impl ScheduleCommand {
    pub fn new(task_id: impl Into<String>, interval: Interval, previous: Option<Interval>) -> Self {
        Self {
            task_id: task_id.into(),
            interval,
            previous,
        }
    }

    /// True when the command leaves the task where it already is.
    pub fn is_noop(&self) -> bool {
        self.previous == Some(self.interval)
    }
}

impl fmt::Display for ScheduleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.previous {
            Some(previous) => write!(f, "{}: {} -> {}", self.task_id, previous, self.interval),
            None => write!(f, "{}: -> {}", self.task_id, self.interval),
        }
    }
}
