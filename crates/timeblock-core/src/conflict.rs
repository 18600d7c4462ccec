//! Interval conflict detection.
//!
//! Every overlap decision in the crate goes through [`Interval::overlaps`]
//! via the functions here, so slot search, auto placement and drag
//! validation agree on what "taken" means.

use tracing::warn;

use crate::grid::Interval;
use crate::task::{Occupant, TaskRef};

/// First task in `existing` (host order) whose interval overlaps `candidate`.
///
/// Unscheduled tasks and the task with id `exclude_id` are skipped, so a task
/// never conflicts with its own current placement.
pub fn find_conflict<T: Occupant>(candidate: &Interval, existing: &[T], exclude_id: Option<&str>) -> Option<TaskRef> {
    conflicting(candidate, existing, exclude_id).next()
}

/// Every task in `existing` that overlaps `candidate`, in host order.
pub fn all_conflicts<T: Occupant>(candidate: &Interval, existing: &[T], exclude_id: Option<&str>) -> Vec<TaskRef> {
    conflicting(candidate, existing, exclude_id).collect()
}

fn conflicting<'a, T: Occupant>(
    candidate: &'a Interval,
    existing: &'a [T],
    exclude_id: Option<&'a str>,
) -> impl Iterator<Item = TaskRef> + 'a {
    existing
        .iter()
        .filter(move |task| exclude_id != Some(task.occupant_id()))
        .filter(move |task| {
            task.scheduled_interval()
                .is_some_and(|interval| interval.overlaps(candidate))
        })
        .filter_map(Occupant::task_ref)
}

/// Pairs of already-committed tasks that overlap each other.
///
/// A clean day returns nothing. Anything returned was committed with the
/// overlap check overridden, or by a writer that skipped it.
pub fn overlapping_pairs<T: Occupant>(tasks: &[T]) -> Vec<(TaskRef, TaskRef)> {
    let scheduled: Vec<TaskRef> = tasks.iter().filter_map(Occupant::task_ref).collect();
    let mut pairs = Vec::new();
    for (i, first) in scheduled.iter().enumerate() {
        for second in &scheduled[i + 1..] {
            if first.interval.overlaps(&second.interval) {
                warn!(
                    first = %first.id,
                    second = %second.id,
                    "committed tasks overlap: {} and {}",
                    first.interval,
                    second.interval
                );
                pairs.push((first.clone(), second.clone()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::NaiveDate;

    fn task(id: &str, start: i64, end: i64) -> Task {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        Task::new(id, format!("Task {id}"), date).with_interval(Interval::from_minutes(start, end).unwrap())
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        let a = task("a", 600, 660);
        let b = task("b", 630, 690);
        let hit = find_conflict(&b.interval.unwrap(), &[a.clone()], None).unwrap();
        assert_eq!(hit.id, "a");
        assert_eq!(find_conflict(&a.interval.unwrap(), &[b], None).unwrap().id, "b");
    }

    #[test]
    fn test_touching_intervals_do_not_conflict() {
        let a = task("a", 480, 540);
        let candidate = Interval::from_minutes(540, 600).unwrap();
        assert!(find_conflict(&candidate, &[a], None).is_none());
    }

    #[test]
    fn test_self_is_excluded() {
        let a = task("a", 480, 540);
        let interval = a.interval.unwrap();
        assert!(find_conflict(&interval, &[a.clone()], Some("a")).is_none());
        assert!(find_conflict(&interval, &[a], None).is_some());
    }

    #[test]
    fn test_first_in_host_order_wins() {
        let tasks = vec![task("late", 700, 760), task("early", 600, 720)];
        let candidate = Interval::from_minutes(650, 710).unwrap();
        assert_eq!(find_conflict(&candidate, &tasks, None).unwrap().id, "late");
        let ids: Vec<_> = all_conflicts(&candidate, &tasks, None).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn test_unscheduled_tasks_ignored() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let loose = Task::new("loose", "Loose", date).with_duration(60);
        let candidate = Interval::from_minutes(0, 1440).unwrap();
        assert!(find_conflict(&candidate, &[loose], None).is_none());
    }

    #[test]
    fn test_midnight_crossing_conflicts_with_late_task() {
        let late = task("late", 1410, 1440);
        let cross = Interval::from_minutes(1380, 1470).unwrap();
        assert!(find_conflict(&cross, &[late], None).is_some());
    }

    #[test]
    fn test_overlapping_pairs() {
        let tasks = vec![task("a", 600, 660), task("b", 630, 690), task("c", 700, 760)];
        let pairs = overlapping_pairs(&tasks);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].0.id.as_str(), pairs[0].1.id.as_str()), ("a", "b"));
    }
}
