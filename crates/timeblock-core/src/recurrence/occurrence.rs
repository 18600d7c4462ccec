//! Per-date materialization of series, with an exception table.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::Series;
use crate::task::{Task, TaskDefinition};

/// An occurrence-specific override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exception {
    /// The occurrence diverges from the series definition.
    Override { definition: TaskDefinition },
    /// The occurrence was deleted on its own.
    Skipped,
}

/// Exceptions keyed by `(series_id, date)`.
///
/// Serialized as a flat list of `{series_id, date, kind, ...}` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ExceptionEntry>", into = "Vec<ExceptionEntry>")]
pub struct ExceptionTable {
    entries: BTreeMap<(String, NaiveDate), Exception>,
}

/// One row of an [`ExceptionTable`] in its serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionEntry {
    pub series_id: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub exception: Exception,
}

impl From<Vec<ExceptionEntry>> for ExceptionTable {
    fn from(entries: Vec<ExceptionEntry>) -> Self {
        let mut table = ExceptionTable::new();
        for entry in entries {
            table.insert(entry.series_id, entry.date, entry.exception);
        }
        table
    }
}

impl From<ExceptionTable> for Vec<ExceptionEntry> {
    fn from(table: ExceptionTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|((series_id, date), exception)| ExceptionEntry { series_id, date, exception })
            .collect()
    }
}

impl ExceptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, series_id: &str, date: NaiveDate) -> Option<&Exception> {
        self.entries.get(&(series_id.to_string(), date))
    }

    pub fn insert(&mut self, series_id: impl Into<String>, date: NaiveDate, exception: Exception) -> Option<Exception> {
        self.entries.insert((series_id.into(), date), exception)
    }

    /// Drop every exception of `series_id` dated after `end_date`.
    pub fn truncate_after(&mut self, series_id: &str, end_date: NaiveDate) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|(id, date), _| id != series_id || *date <= end_date);
        before - self.entries.len()
    }

    pub fn remove_series(&mut self, series_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(id, _), _| id != series_id);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate, &Exception)> {
        self.entries
            .iter()
            .map(|((id, date), exception)| (id.as_str(), *date, exception))
    }
}

/// Concrete tasks that `series` produce on `date`, after applying exceptions.
///
/// Each occurrence gets the id [`Series::occurrence_id`], so it can be
/// scheduled and conflict-checked like any one-off task.
pub fn occurrences_on(series: &[Series], exceptions: &ExceptionTable, date: NaiveDate) -> Vec<Task> {
    series
        .iter()
        .filter(|s| s.occurs_on(date))
        .filter_map(|s| {
            let definition = match exceptions.get(&s.id, date) {
                Some(Exception::Skipped) => return None,
                Some(Exception::Override { definition }) => definition,
                None => &s.definition,
            };
            Some(definition.to_task(s.occurrence_id(date), date, s.recurrence.clone()))
        })
        .collect()
}
