//! # Timeblock Core Library
//!
//! This library provides the scheduling engine behind timeblock: placing
//! duration-bound tasks on a discretized day, detecting overlaps, finding
//! free capacity, validating drag moves and resolving edit scopes for
//! recurring series. It follows a CLI-first philosophy where every
//! operation is available via the standalone `timeblock-cli` binary.
//!
//! ## Architecture
//!
//! - **Grid**: minute-of-day intervals, fixed-width day slots and the
//!   occupancy of those slots by committed tasks
//! - **Conflict**: the single overlap rule everything else defers to
//! - **Scheduler**: free-window search, auto placement and drag validation
//! - **Recurrence**: series expansion, exceptions and scope resolution
//! - **Store**: the trait hosts implement to commit engine output
//! - **Storage**: TOML-based configuration
//!
//! The engine is pure: every operation takes its inputs as parameters and
//! returns a command or a typed [`ScheduleError`]. Nothing reads the clock.
//!
//! ## Key Components
//!
//! - [`TimeGrid`] and [`OccupancyIndex`]: the day and what occupies it
//! - [`AutoScheduler`]: first-fit placement
//! - [`DragRescheduler`]: drag validation
//! - [`resolve`](recurrence::resolve): scoped series mutations
//! - [`Config`]: engine configuration

pub mod conflict;
pub mod error;
pub mod grid;
pub mod recurrence;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod task;

pub use conflict::{all_conflicts, find_conflict, overlapping_pairs};
pub use error::{ConfigError, CoreError, ScheduleError, ValidationError};
pub use grid::{Interval, OccupancyIndex, TimeGrid, TimeOfDay, TimeSlot};
pub use recurrence::{
    ExceptionTable, RecurrenceDescriptor, RecurrencePattern, RecurrenceScope, Series, SeriesMutation,
    SeriesMutationCommand,
};
pub use scheduler::{AutoScheduler, DragRescheduler, DragSession, PlacementOptions, ScheduleCommand, SchedulerConfig};
pub use storage::Config;
pub use store::{CommitRejection, MemoryStore, ScheduleStore};
pub use task::{EnergyLevel, Priority, Task, TaskDefinition, TaskRecord, TaskRef};
