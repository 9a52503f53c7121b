//! Schedule index: `(day, slot, room)` lookup over a flat assignment list.
//!
//! Built once per assignment-list version; cell lookups are two hash probes.
//! Room columns come from the assignments themselves, not the request, so
//! unused rooms do not produce empty columns.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::model::Assignment;

#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    days: u32,
    slots_per_day: u32,
    rooms: Vec<String>,
    room_positions: HashMap<String, usize>,
    cells: HashMap<(u32, u32, usize), Vec<Assignment>>,
    filieres: BTreeSet<String>,
    promotions: BTreeSet<u32>,
    len: usize,
}

impl ScheduleIndex {
    /// Project `assignments` into a grid of `days × slots_per_day × rooms`.
    ///
    /// Every assignment lands in exactly one bucket, including any the
    /// optimizer placed outside the declared day or slot range.
    #[must_use]
    pub fn build(assignments: &[Assignment], days: u32, slots_per_day: u32) -> Self {
        let rooms: Vec<String> = assignments
            .iter()
            .map(|a| a.room.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let room_positions: HashMap<String, usize> = rooms
            .iter()
            .enumerate()
            .map(|(pos, room)| (room.clone(), pos))
            .collect();

        let mut cells: HashMap<(u32, u32, usize), Vec<Assignment>> = HashMap::new();
        let mut filieres = BTreeSet::new();
        let mut promotions = BTreeSet::new();
        for assignment in assignments {
            let pos = room_positions[&assignment.room];
            cells
                .entry((assignment.day, assignment.slot, pos))
                .or_default()
                .push(assignment.clone());
            filieres.insert(assignment.filiere.clone());
            promotions.insert(assignment.promotion);
        }

        debug!(
            assignments = assignments.len(),
            rooms = rooms.len(),
            populated = cells.len(),
            "schedule index built"
        );

        Self { days, slots_per_day, rooms, room_positions, cells, filieres, promotions, len: assignments.len() }
    }

    /// Assignments placed at `(day, slot, room)`; empty when none.
    #[must_use]
    pub fn cell(&self, day: u32, slot: u32, room: &str) -> &[Assignment] {
        self.room_position(room)
            .and_then(|pos| self.cells.get(&(day, slot, pos)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Column position of `room` in the sorted room order.
    #[must_use]
    pub fn room_position(&self, room: &str) -> Option<usize> {
        self.room_positions.get(room).copied()
    }

    /// Distinct rooms, sorted lexicographically.
    #[must_use]
    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    #[must_use]
    pub fn filieres(&self) -> &BTreeSet<String> {
        &self.filieres
    }

    #[must_use]
    pub fn promotions(&self) -> &BTreeSet<u32> {
        &self.promotions
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        self.days
    }

    #[must_use]
    pub fn slots_per_day(&self) -> u32 {
        self.slots_per_day
    }

    /// Number of indexed assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total grid cells, populated or not.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        (self.days as usize) * (self.slots_per_day as usize) * self.rooms.len()
    }

    /// Populated cells as `(day, slot, room, assignments)`, in day, slot, column order.
    #[must_use]
    pub fn populated(&self) -> Vec<(u32, u32, &str, &[Assignment])> {
        let mut out: Vec<_> = self
            .cells
            .iter()
            .map(|(&(day, slot, pos), list)| (day, slot, self.rooms[pos].as_str(), list.as_slice()))
            .collect();
        out.sort_by_key(|&(day, slot, room, _)| (day, slot, self.room_positions[room]));
        out
    }

    /// Assignments whose day or slot falls outside the declared grid.
    #[must_use]
    pub fn out_of_range(&self) -> Vec<&Assignment> {
        self.populated()
            .into_iter()
            .filter(|&(day, slot, _, _)| day >= self.days || slot >= self.slots_per_day)
            .flat_map(|(_, _, _, list)| list.iter())
            .collect()
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
