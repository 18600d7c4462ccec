//! Slot occupancy for one day.

use super::slots::TimeGrid;
use super::time::Interval;
use crate::task::{Occupant, TaskRef};

/// Maps each slot of a [`TimeGrid`] to the task occupying it, if any.
///
/// When several tasks intersect one slot the first in input order wins. That
/// only happens when overlap validation was bypassed upstream and is not
/// reconciled here.
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    slot_minutes: u32,
    slots: Vec<Interval>,
    occupants: Vec<Option<TaskRef>>,
    committed: Vec<TaskRef>,
}

impl OccupancyIndex {
    pub fn build<T: Occupant>(grid: &TimeGrid, tasks: &[T]) -> Self {
        Self::build_excluding(grid, tasks, None)
    }

    /// Build while leaving `exclude_id` out, for a task that is being moved.
    pub fn build_excluding<T: Occupant>(grid: &TimeGrid, tasks: &[T], exclude_id: Option<&str>) -> Self {
        let committed: Vec<TaskRef> = tasks
            .iter()
            .filter(|t| exclude_id != Some(t.occupant_id()))
            .filter_map(Occupant::task_ref)
            .collect();

        let slots: Vec<Interval> = grid.slots().iter().map(|s| s.interval).collect();
        let occupants = slots
            .iter()
            .map(|slot| committed.iter().find(|t| slot.overlaps(&t.interval)).cloned())
            .collect();

        Self {
            slot_minutes: grid.slot_minutes(),
            slots,
            occupants,
            committed,
        }
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn occupant(&self, index: usize) -> Option<&TaskRef> {
        self.occupants.get(index).and_then(Option::as_ref)
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.occupant(index).is_some()
    }

    /// Scheduled tasks the index was built from, in input order.
    pub fn committed(&self) -> &[TaskRef] {
        &self.committed
    }

    pub fn iter(&self) -> impl Iterator<Item = (Interval, Option<&TaskRef>)> + '_ {
        self.slots
            .iter()
            .copied()
            .zip(self.occupants.iter().map(Option::as_ref))
    }

    /// Mark the free slots intersecting `task.interval` as taken by `task`.
    /// Returns how many slots changed hands.
    pub fn claim(&mut self, task: TaskRef) -> usize {
        let mut claimed = 0;
        for (slot, occupant) in self.slots.iter().zip(self.occupants.iter_mut()) {
            if occupant.is_none() && slot.overlaps(&task.interval) {
                *occupant = Some(task.clone());
                claimed += 1;
            }
        }
        self.committed.push(task);
        claimed
    }

    pub fn free_minutes(&self) -> u32 {
        self.occupants.iter().filter(|o| o.is_none()).count() as u32 * self.slot_minutes
    }

    /// Length of the longest run of consecutive free slots, in minutes.
    pub fn longest_free_run_minutes(&self) -> u32 {
        let mut best = 0;
        let mut run = 0;
        for occupant in &self.occupants {
            if occupant.is_none() {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }
        best * self.slot_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TimeOfDay;

    fn task_ref(id: &str, start: &str, end: &str) -> TaskRef {
        let start: TimeOfDay = start.parse().unwrap();
        let end: TimeOfDay = end.parse().unwrap();
        TaskRef {
            id: id.to_string(),
            title: format!("Task {id}"),
            interval: Interval::new(start, end).unwrap(),
        }
    }

    #[test]
    fn test_occupancy_marks_intersecting_slots() {
        let grid = TimeGrid::generate(8, 12, 15).unwrap();
        let tasks = vec![task_ref("a", "09:10", "09:40")];
        let index = OccupancyIndex::build(&grid, &tasks);

        // 09:00-09:15, 09:15-09:30, 09:30-09:45
        assert!(!index.is_occupied(3));
        assert!(index.is_occupied(4));
        assert!(index.is_occupied(5));
        assert!(index.is_occupied(6));
        assert!(!index.is_occupied(7));
    }

    #[test]
    fn test_touching_task_does_not_occupy_neighbour() {
        let grid = TimeGrid::generate(8, 10, 15).unwrap();
        let tasks = vec![task_ref("a", "08:00", "08:30")];
        let index = OccupancyIndex::build(&grid, &tasks);
        assert!(index.is_occupied(1));
        assert!(!index.is_occupied(2));
    }

    #[test]
    fn test_first_task_wins_on_overlap() {
        let grid = TimeGrid::generate(8, 10, 15).unwrap();
        let tasks = vec![task_ref("first", "08:00", "09:00"), task_ref("second", "08:30", "09:30")];
        let index = OccupancyIndex::build(&grid, &tasks);
        assert_eq!(index.occupant(2).map(|t| t.id.as_str()), Some("first"));
        assert_eq!(index.occupant(4).map(|t| t.id.as_str()), Some("second"));
    }

    #[test]
    fn test_build_excluding_and_claim() {
        let grid = TimeGrid::generate(8, 10, 30).unwrap();
        let tasks = vec![task_ref("a", "08:00", "08:30"), task_ref("b", "09:00", "09:30")];
        let mut index = OccupancyIndex::build_excluding(&grid, &tasks, Some("a"));
        assert!(!index.is_occupied(0));
        assert_eq!(index.committed().len(), 1);
        assert_eq!(index.free_minutes(), 90);
        assert_eq!(index.longest_free_run_minutes(), 60);

        let claimed = index.claim(task_ref("c", "08:00", "09:00"));
        assert_eq!(claimed, 2);
        assert_eq!(index.free_minutes(), 30);
        assert_eq!(index.committed().len(), 2);
    }
}
