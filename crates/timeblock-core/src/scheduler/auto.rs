//! Automatic placement of unscheduled tasks.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::command::ScheduleCommand;
use super::slots::find_windows;
use crate::conflict::find_conflict;
use crate::error::ScheduleError;
use crate::grid::{OccupancyIndex, TimeGrid};
use crate::task::{Occupant, Task, TaskRef};

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Duration used for tasks that declare none (minutes)
    pub default_duration_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 30,
        }
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementOptions {
    /// Skip the final conflict re-check. Set only when the user has
    /// explicitly chosen to accept an overlap.
    pub ignore_overlap: bool,
}

/// A task [`AutoScheduler::schedule_all`] could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unplaced {
    pub task_id: String,
    pub error: String,
    #[serde(skip)]
    pub reason: Option<ScheduleError>,
}

/// Result of a batch placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub placed: Vec<ScheduleCommand>,
    pub unplaced: Vec<Unplaced>,
}

/// Places tasks into the first free window that fits.
#[derive(Debug, Clone, Default)]
pub struct AutoScheduler {
    config: SchedulerConfig,
}

impl AutoScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Place `task` in the first window of `occupancy` that fits its duration.
    ///
    /// `occupancy` should not contain `task` itself when rescheduling an
    /// already placed task (see [`OccupancyIndex::build_excluding`]). The
    /// chosen window is re-checked against the tasks the occupancy was built
    /// from.
    pub fn schedule(
        &self,
        task: &Task,
        grid: &TimeGrid,
        occupancy: &OccupancyIndex,
    ) -> Result<ScheduleCommand, ScheduleError> {
        self.schedule_with(task, grid, occupancy, occupancy.committed(), PlacementOptions::default())
    }

    /// Like [`schedule`](Self::schedule), re-checking against `existing`
    /// instead. Hosts pass their current task list here when the occupancy
    /// snapshot may be older than it.
    pub fn schedule_with<T: Occupant>(
        &self,
        task: &Task,
        grid: &TimeGrid,
        occupancy: &OccupancyIndex,
        existing: &[T],
        options: PlacementOptions,
    ) -> Result<ScheduleCommand, ScheduleError> {
        let duration = task.effective_duration(self.config.default_duration_minutes);
        let window = find_windows(occupancy, duration)
            .into_iter()
            .next()
            .ok_or(ScheduleError::NoAvailableSlot { duration_minutes: duration })?;

        if !options.ignore_overlap {
            if let Some(conflicting) = find_conflict(&window, existing, Some(&task.id)) {
                warn!(task = %task.id, %window, blocking = %conflicting.id, "free window is taken by a newer task");
                return Err(ScheduleError::Conflict {
                    candidate: window,
                    conflicting: Box::new(conflicting),
                });
            }
        }

        debug!(task = %task.id, %window, grid = %grid.bounds(), "auto placed task");
        Ok(ScheduleCommand::new(task.id.clone(), window, task.interval))
    }

    /// Place every unscheduled task in `tasks` around the scheduled ones.
    ///
    /// Tasks are taken by priority (highest first), then shortest duration,
    /// then input order. Each placement claims its slots before the next task
    /// is considered, so the returned commands never overlap each other.
    pub fn schedule_all(&self, tasks: &[Task], grid: &TimeGrid) -> BatchOutcome {
        let mut occupancy = OccupancyIndex::build(grid, tasks);
        let default = self.config.default_duration_minutes;

        let mut pending: Vec<&Task> = tasks.iter().filter(|t| !t.is_scheduled()).collect();
        // stable: equal keys keep input order
        pending.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.effective_duration(default).cmp(&b.effective_duration(default)))
        });

        let mut outcome = BatchOutcome::default();
        for task in pending {
            match self.schedule(task, grid, &occupancy) {
                Ok(command) => {
                    occupancy.claim(TaskRef {
                        id: task.id.clone(),
                        title: task.title.clone(),
                        interval: command.interval,
                    });
                    outcome.placed.push(command);
                }
                Err(err) => {
                    debug!(task = %task.id, error = %err, "could not place task");
                    outcome.unplaced.push(Unplaced {
                        task_id: task.id.clone(),
                        error: err.to_string(),
                        reason: Some(err),
                    });
                }
            }
        }
        outcome
    }
}
