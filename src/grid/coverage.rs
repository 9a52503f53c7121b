//! Multi-slot coverage: which cells an assignment occupies.
//!
//! The optimizer's response carries no duration, so an exam's span has to be
//! recovered from the request. [`CoverageResolver::from_exams`] re-joins on
//! exam name; names whose requested durations disagree are ambiguous and fall
//! back to a single slot, as does every exam under
//! [`CoverageResolver::single_slot`]. Spans never spill past the end of the
//! day.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::model::{Assignment, ExamRequest};

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub day: u32,
    pub slot: u32,
    pub room: String,
}

#[derive(Debug, Clone, Default)]
pub struct CoverageResolver {
    durations: HashMap<String, u32>,
    ambiguous: HashSet<String>,
    slots_per_day: Option<u32>,
}

impl CoverageResolver {
    /// Every assignment covers exactly its own cell.
    #[must_use]
    pub fn single_slot() -> Self {
        Self::default()
    }

    /// Recover durations from the submitted exams by name.
    #[must_use]
    pub fn from_exams(exams: &[ExamRequest]) -> Self {
        let mut durations: HashMap<String, u32> = HashMap::new();
        let mut ambiguous = HashSet::new();
        for exam in exams {
            if ambiguous.contains(exam.name()) {
                continue;
            }
            match durations.get(exam.name()) {
                Some(&known) if known != exam.duration() => {
                    debug!(exam = exam.name(), "conflicting durations for exam name; using one slot");
                    durations.remove(exam.name());
                    ambiguous.insert(exam.name().to_owned());
                }
                Some(_) => {}
                None => {
                    durations.insert(exam.name().to_owned(), exam.duration());
                }
            }
        }
        Self { durations, ambiguous, slots_per_day: None }
    }

    /// Clip spans at `slots_per_day`.
    #[must_use]
    pub fn with_day_length(mut self, slots_per_day: u32) -> Self {
        self.slots_per_day = Some(slots_per_day);
        self
    }

    /// Slots spanned by exams named `name`; 1 when unknown or ambiguous.
    #[must_use]
    pub fn duration_of(&self, name: &str) -> u32 {
        self.durations.get(name).copied().unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous.contains(name)
    }

    fn end_slot(&self, assignment: &Assignment) -> u32 {
        let end = assignment
            .slot
            .saturating_add(self.duration_of(&assignment.name));
        match self.slots_per_day {
            Some(limit) => end.min(limit.max(assignment.slot.saturating_add(1))),
            None => end,
        }
    }

    /// Cells occupied by `assignment`, in slot order. Always includes its own cell.
    #[must_use]
    pub fn covered_cells(&self, assignment: &Assignment) -> Vec<Cell> {
        (assignment.slot..self.end_slot(assignment))
            .map(|slot| Cell { day: assignment.day, slot, room: assignment.room.clone() })
            .collect()
    }

    /// Whether `(day, slot, room)` lies in `assignment`'s span.
    #[must_use]
    pub fn covers(&self, assignment: &Assignment, day: u32, slot: u32, room: &str) -> bool {
        assignment.day == day && assignment.room == room && slot >= assignment.slot && slot < self.end_slot(assignment)
    }
}

/// A cell claimed by more than one distinct exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub cell: Cell,
    pub exams: Vec<String>,
}

/// Cells covered by two or more differently named exams, in cell order.
///
/// An exam split across rooms never conflicts with itself.
#[must_use]
pub fn conflicts(assignments: &[Assignment], resolver: &CoverageResolver) -> Vec<Conflict> {
    let mut occupancy: BTreeMap<Cell, BTreeSet<&str>> = BTreeMap::new();
    for assignment in assignments {
        for cell in resolver.covered_cells(assignment) {
            occupancy
                .entry(cell)
                .or_default()
                .insert(assignment.name.as_str());
        }
    }
    occupancy
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(cell, names)| Conflict { cell, exams: names.into_iter().map(str::to_owned).collect() })
        .collect()
}

#[cfg(test)]
#[path = "coverage_test.rs"]
mod tests;
