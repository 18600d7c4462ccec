//! Placement engines.
//!
//! - [`find_windows`]: every free window of a duration on an occupancy snapshot
//! - [`AutoScheduler`]: first-fit placement of one task or a whole day
//! - [`DragRescheduler`]: validation of pointer drags, with [`DragSession`]
//!   for the gesture lifecycle
//!
//! All of them return a [`ScheduleCommand`] for the host to commit, or a
//! typed [`ScheduleError`](crate::error::ScheduleError).

mod auto;
mod command;
mod drag;
mod slots;

pub use auto::{AutoScheduler, BatchOutcome, PlacementOptions, SchedulerConfig, Unplaced};
pub use command::ScheduleCommand;
pub use drag::{DragRescheduler, DragSession};
pub use slots::find_windows;
