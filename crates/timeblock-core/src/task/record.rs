//! Host-facing task records.
//!
//! The task supplier hands over tasks shaped as
//! `{id, date, start_time: "HH:MM"|null, end_time: "HH:MM"|null,
//! duration_minutes, priority, energy_level, recurrence: {pattern, days,
//! end_date}, goal_id}`. Ids may be numbers or strings, custom days may be a
//! list or a `"0,1,3"` string, and empty strings stand in for null. This
//! module turns that into [`Task`] and rejects anything the engine cannot
//! trust.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EnergyLevel, Priority, Task};
use crate::error::{CoreError, ValidationError};
use crate::grid::{format_end, parse_end, Interval, TimeOfDay};
use crate::recurrence::RecurrenceDescriptor;

/// An id as the host sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Custom weekday list, either `[0, 2, 4]` or `"0,2,4"` (0 = Monday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaysRecord {
    List(Vec<u8>),
    Csv(String),
}

impl DaysRecord {
    pub(crate) fn to_indices(&self) -> Result<Vec<u8>, ValidationError> {
        match self {
            DaysRecord::List(days) => Ok(days.clone()),
            DaysRecord::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<u8>().map_err(|_| ValidationError::InvalidValue {
                        field: "recurrence.days".to_string(),
                        message: format!("'{part}' is not a weekday index"),
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRecord {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub days: Option<DaysRecord>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A task exactly as the supplier sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub energy_level: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRecord>,
    #[serde(default)]
    pub goal_id: Option<RecordId>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TaskRecord {
    /// Parse a JSON array of records into tasks, failing on the first bad one.
    pub fn parse_many(json: &str) -> Result<Vec<Task>, CoreError> {
        let records: Vec<TaskRecord> = serde_json::from_str(json)?;
        records
            .into_iter()
            .map(|record| Task::try_from(record).map_err(CoreError::from))
            .collect()
    }

    fn interval(&self, task_id: &str) -> Result<Option<Interval>, ValidationError> {
        match (non_empty(&self.start_time), non_empty(&self.end_time)) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ValidationError::HalfScheduled {
                task_id: task_id.to_string(),
                present: "start_time",
                missing: "end_time",
            }),
            (None, Some(_)) => Err(ValidationError::HalfScheduled {
                task_id: task_id.to_string(),
                present: "end_time",
                missing: "start_time",
            }),
            (Some(start), Some(end)) => {
                let start = TimeOfDay::parse_field("start_time", start)?;
                let end = parse_end("end_time", end)?;
                Interval::from_clock(start, end)
                    .map(Some)
                    .map_err(|err| ValidationError::InvalidValue {
                        field: "end_time".to_string(),
                        message: err.to_string(),
                    })
            }
        }
    }

    fn recurrence(&self) -> Result<RecurrenceDescriptor, ValidationError> {
        match self.recurrence.clone() {
            Some(record) => RecurrenceDescriptor::try_from(record),
            None => Ok(RecurrenceDescriptor::default()),
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = record.id.to_string();
        let interval = record.interval(&id)?;

        let declared = record.duration_minutes.filter(|minutes| *minutes > 0);
        let duration_minutes = match (interval, declared) {
            (Some(interval), Some(declared)) if declared != interval.duration_minutes() => {
                return Err(ValidationError::DurationMismatch {
                    task_id: id,
                    declared,
                    actual: interval.duration_minutes(),
                });
            }
            (Some(interval), _) => Some(interval.duration_minutes()),
            (None, declared) => declared,
        };

        let priority = match record.priority {
            Some(raw) => Priority::try_from(raw).map_err(|message| ValidationError::InvalidValue {
                field: "priority".to_string(),
                message,
            })?,
            None => Priority::default(),
        };

        let energy_level = match non_empty(&record.energy_level) {
            Some(raw) => EnergyLevel::parse(raw).ok_or_else(|| ValidationError::InvalidValue {
                field: "energy_level".to_string(),
                message: format!("expected low, medium or high, got '{raw}'"),
            })?,
            None => EnergyLevel::default(),
        };

        let recurrence = record.recurrence()?;

        Ok(Task {
            id,
            title: record.title.unwrap_or_default(),
            date: record.date,
            interval,
            duration_minutes,
            priority,
            energy_level,
            recurrence,
            goal_id: record.goal_id.map(|g| g.to_string()),
        })
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let energy = match task.energy_level {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        };
        TaskRecord {
            id: RecordId::Text(task.id.clone()),
            title: Some(task.title.clone()),
            date: task.date,
            start_time: task.interval.map(|i| i.start().to_string()),
            end_time: task.interval.map(|i| format_end(i.end_minutes())),
            duration_minutes: task.duration_minutes,
            priority: Some(task.priority.into()),
            energy_level: Some(energy.to_string()),
            recurrence: Some(RecurrenceRecord {
                pattern: Some(task.recurrence.pattern.name().to_string()),
                days: task
                    .recurrence
                    .pattern
                    .custom_day_indices()
                    .map(DaysRecord::List),
                end_date: task.recurrence.end_date,
            }),
            goal_id: task.goal_id.clone().map(RecordId::Text),
        }
    }
}
