//! End-to-end scheduling scenarios.
//!
//! Each test drives the engine the way a host would: parse host records,
//! build the day's occupancy, ask for a placement and check the command.

use chrono::NaiveDate;
use timeblock_core::recurrence::{resolve, RecurrenceScope, Series, SeriesMutation, SeriesMutationCommand};
use timeblock_core::scheduler::find_windows;
use timeblock_core::{
    find_conflict, AutoScheduler, DragRescheduler, Interval, OccupancyIndex, RecurrenceDescriptor, ScheduleError,
    Task, TaskRecord, TimeGrid, TimeOfDay,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn task(id: &str, start: &str, end: &str) -> Task {
    let start: TimeOfDay = start.parse().unwrap();
    let end: TimeOfDay = end.parse().unwrap();
    Task::new(id, format!("Task {id}"), day()).with_interval(Interval::new(start, end).unwrap())
}

#[test]
fn test_empty_day_places_at_grid_start() {
    let grid = TimeGrid::generate(8, 18, 15).unwrap();
    let occupancy = OccupancyIndex::build::<Task>(&grid, &[]);
    let pending = Task::new("new", "Deep work", day()).with_duration(60);

    let command = AutoScheduler::new().schedule(&pending, &grid, &occupancy).unwrap();
    assert_eq!(command.task_id, "new");
    assert_eq!(command.interval.to_string(), "08:00-09:00");
}

#[test]
fn test_placement_follows_existing_task() {
    let grid = TimeGrid::generate(8, 18, 15).unwrap();
    let existing = vec![task("standup", "08:00", "09:00")];
    let occupancy = OccupancyIndex::build(&grid, &existing);
    let pending = Task::new("new", "Deep work", day()).with_duration(60);

    let command = AutoScheduler::new().schedule(&pending, &grid, &occupancy).unwrap();
    assert_eq!(command.interval.to_string(), "09:00-10:00");
}

#[test]
fn test_overlapping_candidate_reports_existing_task() {
    let a = task("a", "10:00", "11:00");
    let b = task("b", "10:30", "11:30");
    let hit = find_conflict(&b.interval.unwrap(), &[a.clone()], None).unwrap();
    assert_eq!(hit.id, "a");
    assert_eq!(hit.interval, a.interval.unwrap());
}

#[test]
fn test_drag_forty_pixels_at_two_per_minute() {
    let moving = task("a", "09:00", "09:30");
    let bounds = Interval::from_minutes(5 * 60, 23 * 60).unwrap();
    let command = DragRescheduler::default()
        .reschedule(&moving, 40.0, 2.0, &bounds, &[moving.clone()])
        .unwrap();
    assert_eq!(command.interval.to_string(), "09:20-09:50");
    assert_eq!(command.previous.unwrap().to_string(), "09:00-09:30");
}

#[test]
fn test_this_and_future_edit_of_daily_series() {
    let base = Task::new("", "Journal", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .with_interval(Interval::from_minutes(21 * 60, 21 * 60 + 30).unwrap());
    let series = Series {
        id: "journal".to_string(),
        start_date: base.date,
        recurrence: RecurrenceDescriptor::daily(),
        definition: base.definition(),
    };
    let mut edited = base.definition();
    edited.title = "Evening journal".to_string();

    let commands = resolve(&series, day(), RecurrenceScope::ThisAndFuture, SeriesMutation::Edit(edited)).unwrap();
    match commands.as_slice() {
        [SeriesMutationCommand::TerminateSeries { series_id, end_date }, SeriesMutationCommand::CreateSeries { start_date, recurrence, definition }] =>
        {
            assert_eq!(series_id, "journal");
            assert_eq!(*end_date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
            assert_eq!(*start_date, day());
            assert_eq!(*recurrence, RecurrenceDescriptor::daily());
            assert_eq!(definition.title, "Evening journal");
        }
        other => panic!("unexpected commands: {other:?}"),
    }
}

#[test]
fn test_records_feed_the_scheduler() {
    let json = r#"[
        {"id": 1, "title": "Standup", "date": "2024-01-10", "start_time": "08:00", "end_time": "08:15",
         "duration_minutes": 15, "priority": 2, "energy_level": "low", "recurrence": null, "goal_id": null},
        {"id": 2, "title": "Review", "date": "2024-01-10", "start_time": null, "end_time": null,
         "duration_minutes": 45, "priority": 4, "energy_level": "high", "recurrence": null, "goal_id": 9},
        {"id": 3, "title": "Inbox", "date": "2024-01-10", "start_time": null, "end_time": null,
         "duration_minutes": 0, "priority": 1, "energy_level": null, "recurrence": null, "goal_id": null}
    ]"#;
    let tasks = TaskRecord::parse_many(json).unwrap();
    let grid = TimeGrid::generate(8, 10, 15).unwrap();

    let outcome = AutoScheduler::new().schedule_all(&tasks, &grid);
    let placed: Vec<String> = outcome
        .placed
        .iter()
        .map(|c| format!("{}={}", c.task_id, c.interval))
        .collect();
    assert_eq!(placed, vec!["2=08:15-09:00", "3=09:00-09:30"]);
    assert!(outcome.unplaced.is_empty());
}

#[test]
fn test_full_day_reports_no_slot_not_conflict() {
    let grid = TimeGrid::generate(8, 9, 15).unwrap();
    let existing = vec![task("block", "08:00", "09:00")];
    let occupancy = OccupancyIndex::build(&grid, &existing);
    let pending = Task::new("p", "Pending", day());

    assert!(find_windows(&occupancy, 15).is_empty());
    let err = AutoScheduler::new().schedule(&pending, &grid, &occupancy).unwrap_err();
    assert_eq!(err, ScheduleError::NoAvailableSlot { duration_minutes: 30 });
    assert!(err.conflicting_task().is_none());
}

#[test]
fn test_midnight_crossing_task() {
    let late = task("late", "23:00", "00:30");
    let interval = late.interval.unwrap();
    assert_eq!(interval.duration_minutes(), 90);
    assert!(interval.crosses_midnight());

    let before = Interval::from_minutes(22 * 60 + 30, 23 * 60 + 15).unwrap();
    assert_eq!(find_conflict(&before, &[late], None).unwrap().id, "late");
}
