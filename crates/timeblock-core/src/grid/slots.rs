//! Discretized day grid.

use serde::Serialize;

use super::time::{Interval, MINUTES_PER_DAY};
use crate::error::ScheduleError;

/// One fixed-width cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub index: usize,
    pub interval: Interval,
}

/// Ordered, contiguous slots covering `[lower_hour, upper_hour)`.
#[derive(Debug, Clone, Serialize)]
pub struct TimeGrid {
    slot_minutes: u32,
    bounds: Interval,
    slots: Vec<TimeSlot>,
}

impl TimeGrid {
    /// Generate the grid.
    ///
    /// # Errors
    /// `InvalidConfig` when `slot_minutes` does not evenly divide 60, when
    /// `upper_hour <= lower_hour`, or when `upper_hour > 24`.
    pub fn generate(lower_hour: u32, upper_hour: u32, slot_minutes: u32) -> Result<Self, ScheduleError> {
        if slot_minutes == 0 || 60 % slot_minutes != 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "slot_minutes must evenly divide 60, got {slot_minutes}"
            )));
        }
        if upper_hour <= lower_hour {
            return Err(ScheduleError::InvalidConfig(format!(
                "upper_hour ({upper_hour}) must be greater than lower_hour ({lower_hour})"
            )));
        }
        if upper_hour > MINUTES_PER_DAY / 60 {
            return Err(ScheduleError::InvalidConfig(format!(
                "upper_hour must be at most 24, got {upper_hour}"
            )));
        }

        let lower = lower_hour * 60;
        let upper = upper_hour * 60;
        let bounds = Interval::from_minutes(i64::from(lower), i64::from(upper))?;

        let count = ((upper - lower) / slot_minutes) as usize;
        let mut slots = Vec::with_capacity(count);
        for index in 0..count {
            let start = lower + index as u32 * slot_minutes;
            slots.push(TimeSlot {
                index,
                interval: Interval::starting_at(start, slot_minutes)?,
            });
        }

        Ok(Self {
            slot_minutes,
            bounds,
            slots,
        })
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// The whole span covered by the grid.
    pub fn bounds(&self) -> Interval {
        self.bounds
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimeSlot> {
        self.slots.get(index)
    }

    /// The slot containing `minute`, if it falls inside the grid.
    pub fn slot_at(&self, minute: u32) -> Option<&TimeSlot> {
        let lower = self.bounds.start_minutes();
        if minute < lower || minute >= self.bounds.end_minutes() {
            return None;
        }
        self.slots.get(((minute - lower) / self.slot_minutes) as usize)
    }
}
