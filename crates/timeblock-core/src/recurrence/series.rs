//! Recurring series definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::pattern::RecurrenceDescriptor;
use crate::task::TaskDefinition;

/// The abstract definition of a recurring task.
///
/// A series is never expanded eagerly; concrete occurrences are produced per
/// date by [`super::occurrences_on`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub recurrence: RecurrenceDescriptor,
    pub definition: TaskDefinition,
}

impl Series {
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.recurrence.occurs_on(self.start_date, date)
    }

    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        self.recurrence.occurrences_between(self.start_date, from, to)
    }

    /// Stable task id of the occurrence on `date`.
    pub fn occurrence_id(&self, date: NaiveDate) -> String {
        occurrence_id(&self.id, date)
    }
}

pub fn occurrence_id(series_id: &str, date: NaiveDate) -> String {
    format!("{series_id}@{date}")
}

/// Split an occurrence id back into `(series_id, date)`.
pub fn parse_occurrence_id(id: &str) -> Option<(&str, NaiveDate)> {
    let (series_id, date) = id.rsplit_once('@')?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some((series_id, date))
}
