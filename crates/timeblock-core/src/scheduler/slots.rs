//! Free-window search over an occupancy snapshot.

use std::collections::VecDeque;

use crate::grid::{Interval, OccupancyIndex};

/// Every window of `duration_minutes` that fits in the free time of `occupancy`.
///
/// Sliding window over the slots: free slots accumulate into a run, and each
/// time the run spans at least `duration_minutes` a window starting at the
/// oldest slot is emitted and that slot is dropped. An occupied slot resets
/// the run. Windows come out in ascending start order; a zero duration
/// yields none.
pub fn find_windows(occupancy: &OccupancyIndex, duration_minutes: u32) -> Vec<Interval> {
    let mut windows = Vec::new();
    if duration_minutes == 0 {
        return windows;
    }

    let mut run: VecDeque<Interval> = VecDeque::new();
    let mut span = 0;
    for (slot, occupant) in occupancy.iter() {
        if occupant.is_some() {
            run.clear();
            span = 0;
            continue;
        }

        run.push_back(slot);
        span += slot.duration_minutes();

        if span >= duration_minutes {
            if let Some(oldest) = run.pop_front() {
                if let Ok(window) = Interval::starting_at(oldest.start_minutes(), duration_minutes) {
                    windows.push(window);
                }
                span -= oldest.duration_minutes();
            }
        }
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TimeGrid;
    use crate::task::TaskRef;

    fn busy(id: &str, start: i64, end: i64) -> TaskRef {
        TaskRef {
            id: id.to_string(),
            title: id.to_string(),
            interval: Interval::from_minutes(start, end).unwrap(),
        }
    }

    fn starts(windows: &[Interval]) -> Vec<String> {
        windows.iter().map(|w| w.start().to_string()).collect()
    }

    #[test]
    fn test_empty_grid_windows_every_slot() {
        let grid = TimeGrid::generate(8, 10, 30).unwrap();
        let occupancy = OccupancyIndex::build::<TaskRef>(&grid, &[]);
        let windows = find_windows(&occupancy, 60);
        assert_eq!(starts(&windows), vec!["08:00", "08:30", "09:00"]);
        assert!(windows.iter().all(|w| w.duration_minutes() == 60));
    }

    #[test]
    fn test_occupied_slot_resets_run() {
        let grid = TimeGrid::generate(8, 12, 30).unwrap();
        let occupancy = OccupancyIndex::build(&grid, &[busy("a", 540, 600)]);
        let windows = find_windows(&occupancy, 60);
        assert_eq!(starts(&windows), vec!["08:00", "10:00", "10:30", "11:00"]);
    }

    #[test]
    fn test_duration_not_multiple_of_slot() {
        let grid = TimeGrid::generate(8, 9, 15).unwrap();
        let occupancy = OccupancyIndex::build::<TaskRef>(&grid, &[]);
        let windows = find_windows(&occupancy, 20);
        assert_eq!(starts(&windows), vec!["08:00", "08:15", "08:30"]);
        assert_eq!(windows[2].to_string(), "08:30-08:50");
    }

    #[test]
    fn test_too_long_or_zero_yields_nothing() {
        let grid = TimeGrid::generate(8, 9, 15).unwrap();
        let occupancy = OccupancyIndex::build::<TaskRef>(&grid, &[]);
        assert!(find_windows(&occupancy, 61).is_empty());
        assert!(find_windows(&occupancy, 0).is_empty());
    }
}
