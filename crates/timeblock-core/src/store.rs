//! The commit seam between the engine and the host's persistence.
//!
//! The engine only proposes commands. A host implements [`ScheduleStore`] to
//! apply them and may refuse when its state moved on since the engine's
//! snapshot; [`commit`] and [`commit_series`] turn such refusals into
//! [`ScheduleError::StaleCommit`].
//!
//! [`MemoryStore`] is a complete in-memory store: one-off tasks, series and
//! their exceptions, with optimistic checks on schedule commits and
//! all-or-nothing application of series commands.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ScheduleError;
use crate::grid::Interval;
use crate::recurrence::{occurrences_on, parse_occurrence_id, Exception, ExceptionTable, Series, SeriesMutationCommand};
use crate::scheduler::ScheduleCommand;
use crate::task::Task;

/// Why a store refused a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitRejection {
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("unknown series '{0}'")]
    UnknownSeries(String),

    /// The stored interval no longer matches what the engine saw.
    #[error("expected {expected}, store has {actual}")]
    Moved { expected: String, actual: String },

    #[error("{0}")]
    Refused(String),
}

/// Host persistence for engine output.
pub trait ScheduleStore {
    fn commit_schedule(&mut self, command: &ScheduleCommand) -> Result<(), CommitRejection>;

    /// Apply `commands` as one transaction: all of them or none.
    fn apply_series_commands(&mut self, commands: &[SeriesMutationCommand]) -> Result<(), CommitRejection>;
}

/// Commit one placement, reporting a refusal as `StaleCommit`.
pub fn commit<S: ScheduleStore + ?Sized>(store: &mut S, command: &ScheduleCommand) -> Result<(), ScheduleError> {
    store
        .commit_schedule(command)
        .map_err(|rejection| ScheduleError::StaleCommit {
            target: command.task_id.clone(),
            reason: rejection.to_string(),
        })
}

/// Apply resolved series commands, reporting a refusal as `StaleCommit`.
pub fn commit_series<S: ScheduleStore + ?Sized>(
    store: &mut S,
    commands: &[SeriesMutationCommand],
) -> Result<(), ScheduleError> {
    store
        .apply_series_commands(commands)
        .map_err(|rejection| ScheduleError::StaleCommit {
            target: commands.first().map(command_target).unwrap_or_default(),
            reason: rejection.to_string(),
        })
}

fn command_target(command: &SeriesMutationCommand) -> String {
    match command {
        SeriesMutationCommand::UpdateSeries { series_id, .. }
        | SeriesMutationCommand::CreateException { series_id, .. }
        | SeriesMutationCommand::TerminateSeries { series_id, .. }
        | SeriesMutationCommand::DeleteOccurrence { series_id, .. }
        | SeriesMutationCommand::DeleteSeries { series_id } => series_id.clone(),
        SeriesMutationCommand::CreateSeries { start_date, .. } => format!("new series from {start_date}"),
    }
}

fn describe(interval: Option<Interval>) -> String {
    interval.map_or_else(|| "unscheduled".to_string(), |i| i.to_string())
}

/// In-memory [`ScheduleStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    series: Vec<Series>,
    #[serde(default)]
    exceptions: ExceptionTable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn insert_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn insert_series(&mut self, series: Series) {
        match self.series.iter_mut().find(|s| s.id == series.id) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn series_by_id(&self, id: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.id == id)
    }

    pub fn exceptions(&self) -> &ExceptionTable {
        &self.exceptions
    }

    /// Everything on `date`: one-off tasks first, then series occurrences.
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.iter().filter(|t| t.date == date).cloned().collect();
        tasks.extend(occurrences_on(&self.series, &self.exceptions, date));
        tasks
    }

    fn commit_occurrence(&mut self, command: &ScheduleCommand) -> Result<(), CommitRejection> {
        let unknown = || CommitRejection::UnknownTask(command.task_id.clone());
        let (series_id, date) = parse_occurrence_id(&command.task_id).ok_or_else(unknown)?;
        let series = self
            .series
            .iter()
            .find(|s| s.id == series_id && s.occurs_on(date))
            .ok_or_else(unknown)?;

        let mut definition = match self.exceptions.get(series_id, date) {
            Some(Exception::Skipped) => return Err(unknown()),
            Some(Exception::Override { definition }) => definition.clone(),
            None => series.definition.clone(),
        };
        if definition.interval != command.previous {
            return Err(CommitRejection::Moved {
                expected: describe(command.previous),
                actual: describe(definition.interval),
            });
        }
        definition.interval = Some(command.interval);
        definition.duration_minutes = Some(command.interval.duration_minutes());

        let series_id = series_id.to_string();
        self.exceptions
            .insert(series_id, date, Exception::Override { definition });
        Ok(())
    }

    fn next_series_id(&self) -> String {
        let mut n = self.series.len() + 1;
        loop {
            let id = format!("series-{n}");
            if self.series_by_id(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    fn apply_one(&mut self, command: &SeriesMutationCommand) -> Result<(), CommitRejection> {
        match command {
            SeriesMutationCommand::UpdateSeries { series_id, definition } => {
                self.series_mut(series_id)?.definition = definition.clone();
            }
            SeriesMutationCommand::CreateException { series_id, date, definition } => {
                self.require_occurrence(series_id, *date)?;
                self.exceptions.insert(
                    series_id.clone(),
                    *date,
                    Exception::Override { definition: definition.clone() },
                );
            }
            SeriesMutationCommand::TerminateSeries { series_id, end_date } => {
                let series = self.series_mut(series_id)?;
                if *end_date < series.start_date {
                    return Err(CommitRejection::Refused(format!(
                        "series '{series_id}' cannot end on {end_date}, before it starts"
                    )));
                }
                let end = series.recurrence.end_date.map_or(*end_date, |e| e.min(*end_date));
                series.recurrence.end_date = Some(end);
                self.exceptions.truncate_after(series_id, end);
            }
            SeriesMutationCommand::CreateSeries { start_date, recurrence, definition } => {
                let id = self.next_series_id();
                debug!(series = %id, %start_date, "created series");
                self.series.push(Series {
                    id,
                    start_date: *start_date,
                    recurrence: recurrence.clone(),
                    definition: definition.clone(),
                });
            }
            SeriesMutationCommand::DeleteOccurrence { series_id, date } => {
                self.require_occurrence(series_id, *date)?;
                self.exceptions.insert(series_id.clone(), *date, Exception::Skipped);
            }
            SeriesMutationCommand::DeleteSeries { series_id } => {
                self.series_mut(series_id)?;
                self.series.retain(|s| &s.id != series_id);
                self.exceptions.remove_series(series_id);
            }
        }
        Ok(())
    }

    fn series_mut(&mut self, id: &str) -> Result<&mut Series, CommitRejection> {
        self.series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CommitRejection::UnknownSeries(id.to_string()))
    }

    fn require_occurrence(&self, series_id: &str, date: NaiveDate) -> Result<(), CommitRejection> {
        let series = self
            .series_by_id(series_id)
            .ok_or_else(|| CommitRejection::UnknownSeries(series_id.to_string()))?;
        if series.occurs_on(date) {
            Ok(())
        } else {
            Err(CommitRejection::Refused(format!("{date} is not an occurrence of '{series_id}'")))
        }
    }
}

impl ScheduleStore for MemoryStore {
    fn commit_schedule(&mut self, command: &ScheduleCommand) -> Result<(), CommitRejection> {
        let Some(index) = self.tasks.iter().position(|t| t.id == command.task_id) else {
            return self.commit_occurrence(command);
        };
        let task = &mut self.tasks[index];
        if task.interval != command.previous {
            return Err(CommitRejection::Moved {
                expected: describe(command.previous),
                actual: describe(task.interval),
            });
        }
        task.interval = Some(command.interval);
        task.duration_minutes = Some(command.interval.duration_minutes());
        info!(task = %command.task_id, interval = %command.interval, "committed schedule");
        Ok(())
    }

    fn apply_series_commands(&mut self, commands: &[SeriesMutationCommand]) -> Result<(), CommitRejection> {
        let mut staged = self.clone();
        for command in commands {
            staged.apply_one(command)?;
        }
        *self = staged;
        info!(count = commands.len(), "applied series commands");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::RecurrenceDescriptor;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn interval(start: i64, end: i64) -> Interval {
        Interval::from_minutes(start, end).unwrap()
    }

    fn daily_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let definition = Task::new("", "Walk", date(1))
            .with_interval(interval(420, 450))
            .definition();
        store.insert_series(Series {
            id: "walk".to_string(),
            start_date: date(1),
            recurrence: RecurrenceDescriptor::daily(),
            definition,
        });
        store
    }

    #[test]
    fn test_commit_checks_previous_interval() {
        let task = Task::new("a", "Plan", date(2));
        let mut store = MemoryStore::with_tasks(vec![task]);

        let first = ScheduleCommand::new("a", interval(540, 600), None);
        commit(&mut store, &first).unwrap();
        assert_eq!(store.task("a").unwrap().interval, Some(interval(540, 600)));

        // second writer still thinks the task is unscheduled
        let stale = ScheduleCommand::new("a", interval(600, 660), None);
        let err = commit(&mut store, &stale).unwrap_err();
        assert!(matches!(err, ScheduleError::StaleCommit { ref target, .. } if target == "a"));
    }

    #[test]
    fn test_commit_unknown_task() {
        let mut store = MemoryStore::new();
        let command = ScheduleCommand::new("ghost", interval(540, 600), None);
        assert_eq!(
            store.commit_schedule(&command),
            Err(CommitRejection::UnknownTask("ghost".to_string()))
        );
    }

    #[test]
    fn test_commit_occurrence_creates_override() {
        let mut store = daily_store();
        let command = ScheduleCommand::new("walk@2024-01-05", interval(480, 510), Some(interval(420, 450)));
        commit(&mut store, &command).unwrap();

        let moved = store.tasks_on(date(5));
        assert_eq!(moved[0].interval, Some(interval(480, 510)));
        assert_eq!(store.tasks_on(date(6))[0].interval, Some(interval(420, 450)));
    }

    #[test]
    fn test_series_commands_are_atomic() {
        let mut store = daily_store();
        let before = store.clone();
        let commands = vec![
            SeriesMutationCommand::TerminateSeries { series_id: "walk".into(), end_date: date(9) },
            SeriesMutationCommand::DeleteSeries { series_id: "missing".into() },
        ];
        let err = commit_series(&mut store, &commands).unwrap_err();
        assert!(matches!(err, ScheduleError::StaleCommit { .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_terminate_drops_later_exceptions() {
        let mut store = daily_store();
        store
            .apply_series_commands(&[SeriesMutationCommand::DeleteOccurrence { series_id: "walk".into(), date: date(12) }])
            .unwrap();
        store
            .apply_series_commands(&[SeriesMutationCommand::TerminateSeries { series_id: "walk".into(), end_date: date(9) }])
            .unwrap();
        assert!(store.exceptions().is_empty());
        assert!(store.tasks_on(date(10)).is_empty());
        assert_eq!(store.tasks_on(date(9)).len(), 1);
    }
}
