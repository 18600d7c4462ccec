//! Recurring series: patterns, per-date expansion and scoped mutations.

mod occurrence;
mod pattern;
mod scope;
mod series;

pub use occurrence::{occurrences_on, Exception, ExceptionEntry, ExceptionTable};
pub use pattern::{RecurrenceDescriptor, RecurrencePattern};
pub use scope::{resolve, RecurrenceScope, SeriesMutation, SeriesMutationCommand};
pub use series::{occurrence_id, parse_occurrence_id, Series};
