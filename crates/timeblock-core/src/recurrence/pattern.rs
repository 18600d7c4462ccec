//! Recurrence patterns and the "does this series occur on that date" rule.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::task::record::{DaysRecord, RecurrenceRecord};

/// How a series repeats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecurrencePattern {
    /// Single occurrence on the start date.
    #[default]
    None,
    Daily,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
    /// Same weekday as the start date.
    Weekly,
    /// Same day-of-month as the start date. Months without that day are skipped.
    Monthly,
    Custom(Vec<Weekday>),
}

impl RecurrencePattern {
    pub fn name(&self) -> &'static str {
        match self {
            RecurrencePattern::None => "none",
            RecurrencePattern::Daily => "daily",
            RecurrencePattern::Weekdays => "weekdays",
            RecurrencePattern::Weekends => "weekends",
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Monthly => "monthly",
            RecurrencePattern::Custom(_) => "custom",
        }
    }

    /// Custom days as 0 = Monday … 6 = Sunday.
    pub fn custom_day_indices(&self) -> Option<Vec<u8>> {
        match self {
            RecurrencePattern::Custom(days) => Some(
                days.iter()
                    .map(|d| d.num_days_from_monday() as u8)
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn parse(name: &str, days: Option<&[u8]>) -> Result<Self, ValidationError> {
        let pattern = match name.trim().to_ascii_lowercase().as_str() {
            "none" => RecurrencePattern::None,
            "daily" => RecurrencePattern::Daily,
            "weekdays" => RecurrencePattern::Weekdays,
            "weekends" => RecurrencePattern::Weekends,
            "weekly" => RecurrencePattern::Weekly,
            "monthly" => RecurrencePattern::Monthly,
            "custom" => {
                let indices = days.unwrap_or_default();
                if indices.is_empty() {
                    return Err(ValidationError::InvalidValue {
                        field: "recurrence.days".to_string(),
                        message: "custom pattern needs at least one day".to_string(),
                    });
                }
                let mut weekdays = Vec::with_capacity(indices.len());
                for index in indices {
                    let day = weekday_from_index(*index).ok_or_else(|| ValidationError::InvalidValue {
                        field: "recurrence.days".to_string(),
                        message: format!("day index {index} is outside 0-6"),
                    })?;
                    if !weekdays.contains(&day) {
                        weekdays.push(day);
                    }
                }
                RecurrencePattern::Custom(weekdays)
            }
            other => {
                return Err(ValidationError::InvalidValue {
                    field: "recurrence.pattern".to_string(),
                    message: format!("unknown pattern '{other}'"),
                })
            }
        };
        Ok(pattern)
    }
}

fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Pattern plus optional inclusive end date.
///
/// Serialized in the host shape `{"pattern": "custom", "days": [0, 2], "end_date": "2024-02-01"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceRecord", into = "RecurrenceRecord")]
pub struct RecurrenceDescriptor {
    pub pattern: RecurrencePattern,
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceDescriptor {
    pub fn new(pattern: RecurrencePattern, end_date: Option<NaiveDate>) -> Self {
        Self { pattern, end_date }
    }

    pub fn daily() -> Self {
        Self::new(RecurrencePattern::Daily, None)
    }

    pub fn from_parts(
        pattern: Option<&str>,
        days: Option<&[u8]>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        let pattern = match pattern {
            Some(name) => RecurrencePattern::parse(name, days)?,
            None => RecurrencePattern::None,
        };
        Ok(Self { pattern, end_date })
    }

    pub fn is_recurring(&self) -> bool {
        self.pattern != RecurrencePattern::None
    }

    /// Whether a series starting on `series_start` has an occurrence on `date`.
    pub fn occurs_on(&self, series_start: NaiveDate, date: NaiveDate) -> bool {
        if date < series_start {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        match &self.pattern {
            RecurrencePattern::None => date == series_start,
            RecurrencePattern::Daily => true,
            RecurrencePattern::Weekdays => date.weekday().num_days_from_monday() < 5,
            RecurrencePattern::Weekends => date.weekday().num_days_from_monday() >= 5,
            RecurrencePattern::Weekly => date.weekday() == series_start.weekday(),
            RecurrencePattern::Monthly => date.day() == series_start.day(),
            RecurrencePattern::Custom(days) => days.contains(&date.weekday()),
        }
    }

    /// Occurrence dates within `[from, to]`, ascending.
    pub fn occurrences_between(
        &self,
        series_start: NaiveDate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        let first = from.max(series_start);
        let last = match self.end_date {
            Some(end) => to.min(end),
            None => to,
        };
        first
            .iter_days()
            .take_while(move |date| *date <= last)
            .filter(move |date| self.occurs_on(series_start, *date))
    }
}

impl TryFrom<RecurrenceRecord> for RecurrenceDescriptor {
    type Error = ValidationError;

    fn try_from(record: RecurrenceRecord) -> Result<Self, Self::Error> {
        let days = record.days.as_ref().map(DaysRecord::to_indices).transpose()?;
        let pattern = record.pattern.as_deref().filter(|p| !p.trim().is_empty());
        Self::from_parts(pattern, days.as_deref(), record.end_date)
    }
}

impl From<RecurrenceDescriptor> for RecurrenceRecord {
    fn from(descriptor: RecurrenceDescriptor) -> Self {
        RecurrenceRecord {
            pattern: Some(descriptor.pattern.name().to_string()),
            days: descriptor.pattern.custom_day_indices().map(DaysRecord::List),
            end_date: descriptor.end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_respects_start_and_end() {
        let rec = RecurrenceDescriptor::new(RecurrencePattern::Daily, Some(date(2024, 1, 5)));
        let start = date(2024, 1, 1);
        assert!(!rec.occurs_on(start, date(2023, 12, 31)));
        assert!(rec.occurs_on(start, date(2024, 1, 1)));
        assert!(rec.occurs_on(start, date(2024, 1, 5)));
        assert!(!rec.occurs_on(start, date(2024, 1, 6)));
    }

    #[test]
    fn test_weekdays_and_weekends() {
        // 2024-01-06 is a Saturday
        let start = date(2024, 1, 1);
        let weekdays = RecurrenceDescriptor::new(RecurrencePattern::Weekdays, None);
        let weekends = RecurrenceDescriptor::new(RecurrencePattern::Weekends, None);
        assert!(weekdays.occurs_on(start, date(2024, 1, 5)));
        assert!(!weekdays.occurs_on(start, date(2024, 1, 6)));
        assert!(weekends.occurs_on(start, date(2024, 1, 6)));
        assert!(weekends.occurs_on(start, date(2024, 1, 7)));
        assert!(!weekends.occurs_on(start, date(2024, 1, 8)));
    }

    #[test]
    fn test_weekly_and_monthly_follow_start_date() {
        let start = date(2024, 1, 31);
        let weekly = RecurrenceDescriptor::new(RecurrencePattern::Weekly, None);
        assert!(weekly.occurs_on(start, date(2024, 2, 7)));
        assert!(!weekly.occurs_on(start, date(2024, 2, 8)));

        let monthly = RecurrenceDescriptor::new(RecurrencePattern::Monthly, None);
        assert!(!monthly.occurs_on(start, date(2024, 2, 29)));
        assert!(monthly.occurs_on(start, date(2024, 3, 31)));
    }

    #[test]
    fn test_non_recurring_only_on_start() {
        let rec = RecurrenceDescriptor::default();
        let start = date(2024, 1, 1);
        assert!(rec.occurs_on(start, start));
        assert!(!rec.occurs_on(start, date(2024, 1, 2)));
        assert!(!rec.is_recurring());
    }

    #[test]
    fn test_occurrences_between() {
        let rec = RecurrenceDescriptor::new(
            RecurrencePattern::Custom(vec![Weekday::Mon, Weekday::Thu]),
            Some(date(2024, 1, 18)),
        );
        let dates: Vec<_> = rec
            .occurrences_between(date(2024, 1, 3), date(2024, 1, 1), date(2024, 1, 31))
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 4), date(2024, 1, 8), date(2024, 1, 11), date(2024, 1, 15), date(2024, 1, 18)]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(RecurrencePattern::parse("fortnightly", None).is_err());
        assert!(RecurrencePattern::parse("custom", None).is_err());
        assert!(RecurrencePattern::parse("custom", Some(&[7])).is_err());
        assert_eq!(
            RecurrencePattern::parse("Custom", Some(&[6, 6, 0])).unwrap(),
            RecurrencePattern::Custom(vec![Weekday::Sun, Weekday::Mon])
        );
    }

    #[test]
    fn test_descriptor_serde_shape() {
        let rec = RecurrenceDescriptor::new(RecurrencePattern::Custom(vec![Weekday::Tue]), None);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"pattern":"custom","days":[1],"end_date":null}"#);
        let back: RecurrenceDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
