//! Domain and wire types for exam scheduling.
//!
//! DESIGN
//! ======
//! Request types serialize directly to the optimizer's JSON shape, so the
//! payload sent over the wire is exactly the validated value. The validated
//! request types have private fields and are only constructed by
//! [`crate::builder`], which keeps "valid constraints" a type-level fact.
//!
//! Assignments carry no identifier; [`AssignmentKey`] is the composite identity
//! `(name, day, slot, room)` used by the edit overlay and hover highlighting.

use serde::{Deserialize, Serialize};

// =============================================================================
// REQUEST
// =============================================================================

/// One exam to place. Every numeric field is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamRequest {
    name: String,
    duration: u32,
    students: u32,
    promotion: u32,
    filiere: String,
}

impl ExamRequest {
    pub(crate) fn new(name: String, duration: u32, students: u32, promotion: u32, filiere: String) -> Self {
        Self { name, duration, students, promotion, filiere }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of consecutive slots the exam occupies.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[must_use]
    pub fn students(&self) -> u32 {
        self.students
    }

    #[must_use]
    pub fn promotion(&self) -> u32 {
        self.promotion
    }

    #[must_use]
    pub fn filiere(&self) -> &str {
        &self.filiere
    }
}

/// One room available to the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomRequest {
    name: String,
    capacity: u32,
}

impl RoomRequest {
    pub(crate) fn new(name: String, capacity: u32) -> Self {
        Self { name, capacity }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// Validated request payload. Serializes to the optimizer's request format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleConstraints {
    days: u32,
    slots_per_day: u32,
    margin: u32,
    exams: Vec<ExamRequest>,
    rooms: Vec<RoomRequest>,
}

impl ScheduleConstraints {
    pub(crate) fn new(
        days: u32,
        slots_per_day: u32,
        margin: u32,
        exams: Vec<ExamRequest>,
        rooms: Vec<RoomRequest>,
    ) -> Self {
        Self { days, slots_per_day, margin, exams, rooms }
    }

    /// The canonical sample request: one exam, one room, a single two-slot day.
    #[must_use]
    pub fn example() -> Self {
        Self::new(
            1,
            2,
            0,
            vec![ExamRequest::new("Algo".into(), 1, 10, 1, "IA".into())],
            vec![RoomRequest::new("A".into(), 20)],
        )
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        self.days
    }

    #[must_use]
    pub fn slots_per_day(&self) -> u32 {
        self.slots_per_day
    }

    #[must_use]
    pub fn margin(&self) -> u32 {
        self.margin
    }

    #[must_use]
    pub fn exams(&self) -> &[ExamRequest] {
        &self.exams
    }

    #[must_use]
    pub fn rooms(&self) -> &[RoomRequest] {
        &self.rooms
    }

    /// Serialize to the wire body. Called once per submission so every retry
    /// sends the same bytes.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for these plain types.
    pub fn to_wire(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

// =============================================================================
// ASSIGNMENT
// =============================================================================

/// One exam placed at a day, slot and room by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub filiere: String,
    pub promotion: u32,
    pub day: u32,
    pub slot: u32,
    pub room: String,
}

impl Assignment {
    #[must_use]
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey { name: self.name.clone(), day: self.day, slot: self.slot, room: self.room.clone() }
    }

    #[must_use]
    pub fn matches_key(&self, key: &AssignmentKey) -> bool {
        self.name == key.name && self.day == key.day && self.slot == key.slot && self.room == key.room
    }
}

/// Composite identity of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentKey {
    pub name: String,
    pub day: u32,
    pub slot: u32,
    pub room: String,
}

// =============================================================================
// RESPONSE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Optimizer response body, consumed once per submission.
///
/// `results` and `total_period` are only optional on the error branch; a
/// success body missing either is incomplete, see [`ScheduleResponse::into_result`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleResponse {
    pub status: ResponseStatus,
    #[serde(rename = "results", default)]
    pub assignments: Option<Vec<Assignment>>,
    #[serde(default)]
    pub total_period: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ScheduleResponse {
    /// The schedule carried by a success body, or `None` when `results` or
    /// `total_period` is missing.
    #[must_use]
    pub fn into_result(self) -> Option<ScheduleResult> {
        Some(ScheduleResult { assignments: self.assignments?, total_period: self.total_period? })
    }
}

/// The accepted outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleResult {
    pub assignments: Vec<Assignment>,
    pub total_period: u32,
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
