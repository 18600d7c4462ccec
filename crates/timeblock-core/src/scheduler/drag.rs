//! Drag-based rescheduling.
//!
//! A drag arrives as a vertical pixel offset. It is converted to minutes
//! with the timeline's pixels-per-minute scale, rounded the way pointer
//! layers round (halves go up), snapped to the configured resolution and
//! then validated against bounds and the day's other tasks.

use tracing::debug;

use super::command::ScheduleCommand;
use crate::conflict::find_conflict;
use crate::error::ScheduleError;
use crate::grid::{Interval, MINUTES_PER_DAY};
use crate::task::{Occupant, Task};

/// Largest offset that can still land inside a day, in either direction.
const MAX_OFFSET_MINUTES: f64 = (2 * MINUTES_PER_DAY) as f64;

/// Round half toward positive infinity, so `-0.5` becomes `0` and `2.5` becomes `3`.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Validates drag gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRescheduler {
    snap_minutes: u32,
}

impl Default for DragRescheduler {
    fn default() -> Self {
        Self { snap_minutes: 1 }
    }
}

impl DragRescheduler {
    /// Snap offsets to multiples of `snap_minutes`.
    pub fn new(snap_minutes: u32) -> Result<Self, ScheduleError> {
        if snap_minutes == 0 {
            return Err(ScheduleError::InvalidConfig(
                "drag snap must be at least 1 minute".to_string(),
            ));
        }
        Ok(Self { snap_minutes })
    }

    pub fn snap_minutes(&self) -> u32 {
        self.snap_minutes
    }

    /// Pixel offset to snapped minute offset.
    pub fn minutes_offset(&self, pixel_offset_y: f64, pixels_per_minute: f64) -> Result<i64, ScheduleError> {
        if !pixels_per_minute.is_finite() || pixels_per_minute <= 0.0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "pixels per minute must be positive, got {pixels_per_minute}"
            )));
        }
        if !pixel_offset_y.is_finite() {
            return Err(ScheduleError::InvalidConfig(format!(
                "pixel offset must be finite, got {pixel_offset_y}"
            )));
        }

        // larger offsets leave any bounds anyway
        let raw = (pixel_offset_y / pixels_per_minute).clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES);
        let minutes = round_half_up(raw);
        if self.snap_minutes <= 1 {
            return Ok(minutes);
        }
        let snap = f64::from(self.snap_minutes);
        Ok(round_half_up(minutes as f64 / snap) * i64::from(self.snap_minutes))
    }

    /// Move `task` by a drag of `pixel_offset_y` pixels.
    ///
    /// The result must stay inside `bounds` and may not overlap any task in
    /// `existing` other than `task` itself. A zero offset validates the task
    /// where it already is.
    pub fn reschedule<T: Occupant>(
        &self,
        task: &Task,
        pixel_offset_y: f64,
        pixels_per_minute: f64,
        bounds: &Interval,
        existing: &[T],
    ) -> Result<ScheduleCommand, ScheduleError> {
        let origin = task
            .interval
            .ok_or_else(|| ScheduleError::Unscheduled(task.id.clone()))?;
        let offset = self.minutes_offset(pixel_offset_y, pixels_per_minute)?;

        let (start, end) = origin.shifted(offset);
        if start < i64::from(bounds.start_minutes()) || end > i64::from(bounds.end_minutes()) {
            return Err(ScheduleError::OutOfBounds {
                start_minutes: start,
                end_minutes: end,
                bounds: *bounds,
            });
        }
        let candidate = Interval::from_minutes(start, end)?;

        if let Some(conflicting) = find_conflict(&candidate, existing, Some(&task.id)) {
            return Err(ScheduleError::Conflict {
                candidate,
                conflicting: Box::new(conflicting),
            });
        }

        debug!(task = %task.id, offset, from = %origin, to = %candidate, "drag accepted");
        Ok(ScheduleCommand::new(task.id.clone(), candidate, Some(origin)))
    }

    /// Start a drag gesture on `task`.
    pub fn begin(&self, task: Task, pixels_per_minute: f64) -> Result<DragSession, ScheduleError> {
        let origin = task
            .interval
            .ok_or_else(|| ScheduleError::Unscheduled(task.id.clone()))?;
        self.minutes_offset(0.0, pixels_per_minute)?;
        Ok(DragSession {
            rescheduler: *self,
            task,
            origin,
            pixels_per_minute,
            pixel_offset_y: 0.0,
        })
    }
}

/// One in-flight drag gesture.
///
/// Moving only previews; nothing is validated until [`release`](Self::release).
/// [`cancel`](Self::cancel) hands back the origin interval and emits nothing.
#[derive(Debug, Clone)]
pub struct DragSession {
    rescheduler: DragRescheduler,
    task: Task,
    origin: Interval,
    pixels_per_minute: f64,
    pixel_offset_y: f64,
}

impl DragSession {
    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn origin(&self) -> Interval {
        self.origin
    }

    pub fn pixel_offset(&self) -> f64 {
        self.pixel_offset_y
    }

    /// Update the pointer offset and return where the task would land.
    ///
    /// `None` when the shifted interval leaves the day entirely; bounds and
    /// conflicts are not checked here.
    pub fn move_to(&mut self, pixel_offset_y: f64) -> Option<Interval> {
        self.pixel_offset_y = pixel_offset_y;
        self.preview()
    }

    pub fn preview(&self) -> Option<Interval> {
        let offset = self
            .rescheduler
            .minutes_offset(self.pixel_offset_y, self.pixels_per_minute)
            .ok()?;
        let (start, end) = self.origin.shifted(offset);
        Interval::from_minutes(start, end).ok()
    }

    pub fn cancel(self) -> Interval {
        debug!(task = %self.task.id, "drag cancelled");
        self.origin
    }

    pub fn release<T: Occupant>(self, bounds: &Interval, existing: &[T]) -> Result<ScheduleCommand, ScheduleError> {
        self.rescheduler.reschedule(
            &self.task,
            self.pixel_offset_y,
            self.pixels_per_minute,
            bounds,
            existing,
        )
    }
}
