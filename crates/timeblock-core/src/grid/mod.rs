//! Discretized day: clock values, intervals, the slot grid, and occupancy.

mod occupancy;
mod slots;
mod time;

pub use occupancy::OccupancyIndex;
pub use slots::{TimeGrid, TimeSlot};
pub use time::{format_end, parse_end, Interval, TimeOfDay, MINUTES_PER_DAY};
