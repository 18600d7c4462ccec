//! Edit/delete scope resolution for recurring series.
//!
//! Given a series, the occurrence the user acted on and the scope they
//! picked, [`resolve`] returns the ordered commands the host must apply as
//! one unit. Nothing here touches storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pattern::RecurrenceDescriptor;
use super::series::Series;
use crate::error::ScheduleError;
use crate::task::TaskDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceScope {
    /// Only the anchored occurrence.
    OnlyThis,
    /// The anchored occurrence and everything after it.
    ThisAndFuture,
    /// The whole series, past occurrences included.
    All,
}

impl std::str::FromStr for RecurrenceScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "only_this" | "this" => Ok(RecurrenceScope::OnlyThis),
            "this_and_future" | "future" => Ok(RecurrenceScope::ThisAndFuture),
            "all" => Ok(RecurrenceScope::All),
            other => Err(format!("unknown scope '{other}'")),
        }
    }
}

/// What the user asked to do to the anchored occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "definition", rename_all = "snake_case")]
pub enum SeriesMutation {
    Edit(TaskDefinition),
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SeriesMutationCommand {
    UpdateSeries {
        series_id: String,
        definition: TaskDefinition,
    },
    CreateException {
        series_id: String,
        date: NaiveDate,
        definition: TaskDefinition,
    },
    /// Set the series' inclusive end date.
    TerminateSeries {
        series_id: String,
        end_date: NaiveDate,
    },
    CreateSeries {
        start_date: NaiveDate,
        recurrence: RecurrenceDescriptor,
        definition: TaskDefinition,
    },
    DeleteOccurrence {
        series_id: String,
        date: NaiveDate,
    },
    DeleteSeries {
        series_id: String,
    },
}

/// Translate a scoped edit or delete into series commands.
///
/// `OnlyThis` and `ThisAndFuture` need `anchor` to be a real occurrence.
/// A `ThisAndFuture` anchored on the series' first day covers the whole
/// series and resolves like `All`.
pub fn resolve(
    series: &Series,
    anchor: NaiveDate,
    scope: RecurrenceScope,
    mutation: SeriesMutation,
) -> Result<Vec<SeriesMutationCommand>, ScheduleError> {
    if scope != RecurrenceScope::All && !series.occurs_on(anchor) {
        return Err(ScheduleError::NotAnOccurrence {
            series_id: series.id.clone(),
            date: anchor,
        });
    }

    let scope = match scope {
        RecurrenceScope::ThisAndFuture if anchor <= series.start_date => RecurrenceScope::All,
        other => other,
    };

    let series_id = series.id.clone();
    let commands = match (scope, mutation) {
        (RecurrenceScope::OnlyThis, SeriesMutation::Edit(definition)) => {
            vec![SeriesMutationCommand::CreateException { series_id, date: anchor, definition }]
        }
        (RecurrenceScope::OnlyThis, SeriesMutation::Delete) => {
            vec![SeriesMutationCommand::DeleteOccurrence { series_id, date: anchor }]
        }
        (RecurrenceScope::ThisAndFuture, mutation) => {
            let end_date = anchor.pred_opt().ok_or_else(|| ScheduleError::NotAnOccurrence {
                series_id: series_id.clone(),
                date: anchor,
            })?;
            let mut commands = vec![SeriesMutationCommand::TerminateSeries { series_id, end_date }];
            if let SeriesMutation::Edit(definition) = mutation {
                commands.push(SeriesMutationCommand::CreateSeries {
                    start_date: anchor,
                    recurrence: series.recurrence.clone(),
                    definition,
                });
            }
            commands
        }
        (RecurrenceScope::All, SeriesMutation::Edit(definition)) => {
            vec![SeriesMutationCommand::UpdateSeries { series_id, definition }]
        }
        (RecurrenceScope::All, SeriesMutation::Delete) => {
            vec![SeriesMutationCommand::DeleteSeries { series_id }]
        }
    };

    debug!(series = %series.id, %anchor, ?scope, count = commands.len(), "resolved series mutation");
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Interval;
    use crate::recurrence::RecurrencePattern;
    use crate::task::{EnergyLevel, Priority};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn definition(title: &str) -> TaskDefinition {
        TaskDefinition {
            title: title.to_string(),
            interval: Some(Interval::from_minutes(480, 510).unwrap()),
            duration_minutes: Some(30),
            priority: Priority::Medium,
            energy_level: EnergyLevel::Medium,
            goal_id: None,
        }
    }

    fn series(pattern: RecurrencePattern) -> Series {
        Series {
            id: "s1".to_string(),
            start_date: date(1),
            recurrence: RecurrenceDescriptor::new(pattern, None),
            definition: definition("Stretch"),
        }
    }

    #[test]
    fn test_this_and_future_edit_splits_series() {
        let daily = series(RecurrencePattern::Daily);
        let edited = definition("Yoga");
        let commands = resolve(&daily, date(10), RecurrenceScope::ThisAndFuture, SeriesMutation::Edit(edited.clone())).unwrap();
        assert_eq!(
            commands,
            vec![
                SeriesMutationCommand::TerminateSeries { series_id: "s1".into(), end_date: date(9) },
                SeriesMutationCommand::CreateSeries {
                    start_date: date(10),
                    recurrence: RecurrenceDescriptor::daily(),
                    definition: edited,
                },
            ]
        );
    }

    #[test]
    fn test_this_and_future_delete_only_terminates() {
        let daily = series(RecurrencePattern::Daily);
        let commands = resolve(&daily, date(10), RecurrenceScope::ThisAndFuture, SeriesMutation::Delete).unwrap();
        assert_eq!(
            commands,
            vec![SeriesMutationCommand::TerminateSeries { series_id: "s1".into(), end_date: date(9) }]
        );
    }

    #[test]
    fn test_this_and_future_on_first_day_covers_series() {
        let daily = series(RecurrencePattern::Daily);
        let delete = resolve(&daily, date(1), RecurrenceScope::ThisAndFuture, SeriesMutation::Delete).unwrap();
        assert_eq!(delete, vec![SeriesMutationCommand::DeleteSeries { series_id: "s1".into() }]);

        let edit = resolve(&daily, date(1), RecurrenceScope::ThisAndFuture, SeriesMutation::Edit(definition("X"))).unwrap();
        assert!(matches!(edit.as_slice(), [SeriesMutationCommand::UpdateSeries { .. }]));
    }

    #[test]
    fn test_only_this() {
        let daily = series(RecurrencePattern::Daily);
        let edit = resolve(&daily, date(5), RecurrenceScope::OnlyThis, SeriesMutation::Edit(definition("Late"))).unwrap();
        assert_eq!(
            edit,
            vec![SeriesMutationCommand::CreateException {
                series_id: "s1".into(),
                date: date(5),
                definition: definition("Late"),
            }]
        );
        let delete = resolve(&daily, date(5), RecurrenceScope::OnlyThis, SeriesMutation::Delete).unwrap();
        assert_eq!(delete, vec![SeriesMutationCommand::DeleteOccurrence { series_id: "s1".into(), date: date(5) }]);
    }

    #[test]
    fn test_all_ignores_anchor() {
        let weekly = series(RecurrencePattern::Weekly);
        let commands = resolve(&weekly, date(3), RecurrenceScope::All, SeriesMutation::Delete).unwrap();
        assert_eq!(commands, vec![SeriesMutationCommand::DeleteSeries { series_id: "s1".into() }]);
    }

    #[test]
    fn test_anchor_must_be_occurrence() {
        // 2024-01-01 is a Monday, so the 3rd is not a weekly occurrence
        let weekly = series(RecurrencePattern::Weekly);
        let err = resolve(&weekly, date(3), RecurrenceScope::OnlyThis, SeriesMutation::Delete).unwrap_err();
        assert_eq!(err, ScheduleError::NotAnOccurrence { series_id: "s1".into(), date: date(3) });
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("this-and-future".parse::<RecurrenceScope>().unwrap(), RecurrenceScope::ThisAndFuture);
        assert_eq!("only_this".parse::<RecurrenceScope>().unwrap(), RecurrenceScope::OnlyThis);
        assert!("some".parse::<RecurrenceScope>().is_err());
    }
}
