//! Minute-of-day values and half-open intervals.
//!
//! All engine arithmetic is done on plain minute counts. Wall-clock strings
//! (`"HH:MM"`) only appear at the edges, through [`TimeOfDay`] parsing and
//! the `Display` impls.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ValidationError};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time within one day, stored as minute-of-day in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(TimeOfDay(minutes as u16))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(TimeOfDay((hour * 60 + minute) as u16))
    }

    /// Reduce any minute count onto the clock face.
    pub fn wrapping(minutes: u32) -> Self {
        TimeOfDay((minutes % MINUTES_PER_DAY) as u16)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Parse `HH:MM` (or `HH:MM:SS`, seconds dropped), naming `field` in the error.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(TimeOfDay::from)
            .map_err(|_| ValidationError::InvalidTime {
                field: field.to_string(),
                value: value.to_string(),
            })
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        TimeOfDay((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse_field("time", s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Render an interval end. Exactly 1440 is shown as `24:00` so a grid that
/// runs to midnight stays readable; later ends wrap onto the next day.
pub fn format_end(minutes: u32) -> String {
    if minutes == MINUTES_PER_DAY {
        "24:00".to_string()
    } else {
        TimeOfDay::wrapping(minutes).to_string()
    }
}

/// Parse an interval end as minutes. `24:00` is accepted as the end of the day.
pub fn parse_end(field: &str, value: &str) -> Result<u32, ValidationError> {
    if value.trim() == "24:00" {
        return Ok(MINUTES_PER_DAY);
    }
    TimeOfDay::parse_field(field, value).map(TimeOfDay::minutes)
}

/// Half-open interval `[start, end)` in minutes from the start of the task's date.
///
/// Invariants: `start < 1440` and `start < end < start + 1440`, except for
/// the whole day `00:00-24:00`. An end past 1440 means the interval runs into
/// the next day. Every valid interval renders to distinct start and end strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub struct Interval {
    start: u32,
    end: u32,
}

impl Interval {
    /// Build from two clock times. An end earlier than the start is read as
    /// next-day (`end + 1440`); equal times are rejected.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, ScheduleError> {
        let start = start.minutes();
        let mut end = end.minutes();
        if end < start {
            end += MINUTES_PER_DAY;
        }
        Self::from_minutes(i64::from(start), i64::from(end))
    }

    /// Like [`Interval::new`], with the end as [`parse_end`] returns it.
    pub fn from_clock(start: TimeOfDay, end_minutes: u32) -> Result<Self, ScheduleError> {
        match TimeOfDay::from_minutes(end_minutes) {
            Some(end) => Self::new(start, end),
            None => Self::from_minutes(i64::from(start.minutes()), i64::from(end_minutes)),
        }
    }

    /// Build from raw minute offsets, without midnight normalization.
    pub fn from_minutes(start: i64, end: i64) -> Result<Self, ScheduleError> {
        let day = i64::from(MINUTES_PER_DAY);
        let span = end.saturating_sub(start);
        if start < 0 || start >= day || span <= 0 || span > day || (span == day && start != 0) {
            return Err(ScheduleError::InvalidInterval {
                start_minutes: start,
                end_minutes: end,
            });
        }
        Ok(Interval {
            start: start as u32,
            end: end as u32,
        })
    }

    /// `[start, start + duration)`.
    pub fn starting_at(start: u32, duration_minutes: u32) -> Result<Self, ScheduleError> {
        Self::from_minutes(
            i64::from(start),
            i64::from(start) + i64::from(duration_minutes),
        )
    }

    pub fn start_minutes(&self) -> u32 {
        self.start
    }

    pub fn end_minutes(&self) -> u32 {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    pub fn start(&self) -> TimeOfDay {
        TimeOfDay::wrapping(self.start)
    }

    /// End as a clock time (wraps for intervals crossing midnight).
    pub fn end(&self) -> TimeOfDay {
        TimeOfDay::wrapping(self.end)
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end > MINUTES_PER_DAY
    }

    /// Half-open overlap: `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Raw bounds after moving both ends by `delta` minutes. Not validated;
    /// saturates instead of overflowing.
    pub fn shifted(&self, delta: i64) -> (i64, i64) {
        (
            i64::from(self.start).saturating_add(delta),
            i64::from(self.end).saturating_add(delta),
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start(), format_end(self.end))
    }
}

/// Wire form: `{"start": "HH:MM", "end": "HH:MM"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IntervalRepr {
    start: String,
    end: String,
}

impl TryFrom<IntervalRepr> for Interval {
    type Error = ScheduleError;

    fn try_from(repr: IntervalRepr) -> Result<Self, Self::Error> {
        let invalid = |_| ScheduleError::InvalidInterval {
            start_minutes: -1,
            end_minutes: -1,
        };
        let start = TimeOfDay::parse_field("start", &repr.start).map_err(invalid)?;
        let end = parse_end("end", &repr.end).map_err(invalid)?;
        Interval::from_clock(start, end)
    }
}

impl From<Interval> for IntervalRepr {
    fn from(interval: Interval) -> Self {
        IntervalRepr {
            start: interval.start().to_string(),
            end: format_end(interval.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(t("08:05").minutes(), 485);
        assert_eq!(t("23:59:30").to_string(), "23:59");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("9".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_midnight_normalization() {
        let interval = Interval::new(t("23:00"), t("01:00")).unwrap();
        assert_eq!(interval.start_minutes(), 23 * 60);
        assert_eq!(interval.end_minutes(), 25 * 60);
        assert_eq!(interval.duration_minutes(), 120);
        assert!(interval.crosses_midnight());
        assert_eq!(interval.to_string(), "23:00-01:00");
    }

    #[test]
    fn test_equal_times_rejected() {
        let err = Interval::new(t("10:00"), t("10:00")).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidInterval { .. }));
    }

    #[test]
    fn test_from_minutes_bounds() {
        assert!(Interval::from_minutes(-5, 10).is_err());
        assert!(Interval::from_minutes(1440, 1500).is_err());
        assert!(Interval::from_minutes(0, 1440).is_ok());
        assert!(Interval::from_minutes(60, 60 + 1441).is_err());
        assert!(Interval::from_minutes(60, 60 + 1440).is_err());
        assert!(Interval::from_minutes(60, 60 + 1439).is_ok());
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = Interval::from_minutes(600, 660).unwrap();
        let b = Interval::from_minutes(660, 720).unwrap();
        let c = Interval::from_minutes(630, 690).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_serde_shape() {
        let interval = Interval::from_minutes(0, 1440).unwrap();
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, r#"{"start":"00:00","end":"24:00"}"#);
        let back: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, interval);

        let night: Interval = serde_json::from_str(r#"{"start":"22:30","end":"00:15"}"#).unwrap();
        assert_eq!(night.duration_minutes(), 105);
    }

    #[test]
    fn test_longest_intervals_survive_serde() {
        for (start, end) in [(0, 1440), (60, 1499), (1380, 1440), (1439, 2878)] {
            let interval = Interval::from_minutes(start, end).unwrap();
            let json = serde_json::to_string(&interval).unwrap();
            let back: Interval = serde_json::from_str(&json).unwrap();
            assert_eq!(back, interval, "{json}");
        }
        assert!(serde_json::from_str::<Interval>(r#"{"start":"01:00","end":"01:00"}"#).is_err());

        let late = Interval::from_clock(t("22:00"), parse_end("end", "24:00").unwrap()).unwrap();
        assert_eq!(late.duration_minutes(), 120);
        assert!(!late.crosses_midnight());
    }
}
