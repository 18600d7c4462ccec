//! Task types consumed by the scheduling engine.
//!
//! A [`Task`] is the engine's strongly-typed view of one task on one date.
//! Hosts usually hand over loosely-typed records instead; those go through
//! [`record::TaskRecord`] first, which is where missing or inconsistent
//! fields are rejected.

pub mod record;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::Interval;
use crate::recurrence::RecurrenceDescriptor;

pub use record::{RecordId, RecurrenceRecord, TaskRecord};

/// Task priority, ordered from least to most pressing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            4 => Ok(Priority::Urgent),
            other => Err(format!("priority must be 1-4, got {other}")),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

/// Energy a task demands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(EnergyLevel::Low),
            "medium" => Some(EnergyLevel::Medium),
            "high" => Some(EnergyLevel::High),
            _ => None,
        }
    }
}

/// One task on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub date: NaiveDate,
    /// `None` means unscheduled.
    #[serde(default)]
    pub interval: Option<Interval>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub energy_level: EnergyLevel,
    #[serde(default)]
    pub recurrence: RecurrenceDescriptor,
    #[serde(default)]
    pub goal_id: Option<String>,
}

impl Task {
    /// An unscheduled, non-recurring task with default attributes.
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            date,
            interval: None,
            duration_minutes: None,
            priority: Priority::default(),
            energy_level: EnergyLevel::default(),
            recurrence: RecurrenceDescriptor::default(),
            goal_id: None,
        }
    }

    /// Schedule at `interval`, keeping the declared duration in step.
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.duration_minutes = Some(interval.duration_minutes());
        self.interval = Some(interval);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_scheduled(&self) -> bool {
        self.interval.is_some()
    }

    /// Declared duration, or `default_minutes` when none (or zero) is declared.
    pub fn effective_duration(&self, default_minutes: u32) -> u32 {
        self.duration_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(default_minutes)
    }

    /// The editable part of the task, as carried by series commands.
    pub fn definition(&self) -> TaskDefinition {
        TaskDefinition {
            title: self.title.clone(),
            interval: self.interval,
            duration_minutes: self.duration_minutes,
            priority: self.priority,
            energy_level: self.energy_level,
            goal_id: self.goal_id.clone(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.interval {
            Some(interval) => write!(f, "{} '{}' {} {}", self.id, self.title, self.date, interval),
            None => write!(f, "{} '{}' {} (unscheduled)", self.id, self.title, self.date),
        }
    }
}

/// Snapshot of a committed task, as reported by occupancy and conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub title: String,
    pub interval: Interval,
}

/// Fields of a task that a recurring series shares across occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub title: String,
    #[serde(default)]
    pub interval: Option<Interval>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub energy_level: EnergyLevel,
    #[serde(default)]
    pub goal_id: Option<String>,
}

impl TaskDefinition {
    /// Instantiate as a concrete task for `date`.
    pub fn to_task(&self, id: impl Into<String>, date: NaiveDate, recurrence: RecurrenceDescriptor) -> Task {
        Task {
            id: id.into(),
            title: self.title.clone(),
            date,
            interval: self.interval,
            duration_minutes: self.duration_minutes,
            priority: self.priority,
            energy_level: self.energy_level,
            recurrence,
            goal_id: self.goal_id.clone(),
        }
    }
}

/// Anything that may sit on the timeline: full tasks or bare references.
pub trait Occupant {
    fn occupant_id(&self) -> &str;

    fn scheduled_interval(&self) -> Option<Interval>;

    fn task_ref(&self) -> Option<TaskRef>;
}

impl Occupant for Task {
    fn occupant_id(&self) -> &str {
        &self.id
    }

    fn scheduled_interval(&self) -> Option<Interval> {
        self.interval
    }

    fn task_ref(&self) -> Option<TaskRef> {
        self.interval.map(|interval| TaskRef {
            id: self.id.clone(),
            title: self.title.clone(),
            interval,
        })
    }
}

impl Occupant for TaskRef {
    fn occupant_id(&self) -> &str {
        &self.id
    }

    fn scheduled_interval(&self) -> Option<Interval> {
        Some(self.interval)
    }

    fn task_ref(&self) -> Option<TaskRef> {
        Some(self.clone())
    }
}
