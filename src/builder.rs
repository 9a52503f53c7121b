//! Constraint payload builder: form rows in, validated request out.
//!
//! DESIGN
//! ======
//! The form keeps raw user input: numeric fields are `Option<i64>` where
//! `None` means "empty or unparseable" and `Some` holds whatever number was
//! typed, including zero and negatives. That lets live feedback tell an empty
//! field apart from an invalid one.
//!
//! Validation is a pure function over the form and fails closed: any invalid
//! row or top-level field rejects the whole payload, and every issue found is
//! reported at once.

use std::fmt;

use serde::Deserialize;

use crate::error::ErrorCode;
use crate::model::{ExamRequest, RoomRequest, ScheduleConstraints};

pub const DEFAULT_DAYS: i64 = 3;
pub const DEFAULT_START_HOUR: i64 = 8;
pub const DEFAULT_END_HOUR: i64 = 18;
/// Bounds of the selectable working day, in hours.
pub const MIN_HOUR: i64 = 8;
pub const MAX_HOUR: i64 = 18;
pub const DEFAULT_MARGIN: i64 = 1;

/// Parse a numeric form field. Empty or unparseable text is absent, not zero.
#[must_use]
pub fn parse_numeric(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

// =============================================================================
// ROWS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamField {
    Name,
    Duration,
    Students,
    Promotion,
    Filiere,
}

impl fmt::Display for ExamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Duration => "duration",
            Self::Students => "students",
            Self::Promotion => "promotion",
            Self::Filiere => "filiere",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    Name,
    Capacity,
}

impl fmt::Display for RoomField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Capacity => "capacity",
        })
    }
}

/// One exam row as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExamInput {
    pub name: String,
    pub duration: Option<i64>,
    pub students: Option<i64>,
    pub promotion: Option<i64>,
    pub filiere: String,
}

impl ExamInput {
    /// Replace one field from raw text.
    pub fn set(&mut self, field: ExamField, raw: &str) {
        match field {
            ExamField::Name => raw.clone_into(&mut self.name),
            ExamField::Duration => self.duration = parse_numeric(raw),
            ExamField::Students => self.students = parse_numeric(raw),
            ExamField::Promotion => self.promotion = parse_numeric(raw),
            ExamField::Filiere => raw.clone_into(&mut self.filiere),
        }
    }

    fn issues(&self, index: usize, out: &mut Vec<FieldIssue>) {
        let mut flag = |field| out.push(FieldIssue::Exam { index, field });
        if self.name.trim().is_empty() {
            flag(ExamField::Name);
        }
        if positive(self.duration).is_none() {
            flag(ExamField::Duration);
        }
        if positive(self.students).is_none() {
            flag(ExamField::Students);
        }
        if positive(self.promotion).is_none() {
            flag(ExamField::Promotion);
        }
        if self.filiere.trim().is_empty() {
            flag(ExamField::Filiere);
        }
    }

    fn to_request(&self) -> Option<ExamRequest> {
        if self.name.trim().is_empty() || self.filiere.trim().is_empty() {
            return None;
        }
        Some(ExamRequest::new(
            self.name.clone(),
            positive(self.duration)?,
            positive(self.students)?,
            positive(self.promotion)?,
            self.filiere.clone(),
        ))
    }
}

/// One room row as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoomInput {
    pub name: String,
    pub capacity: Option<i64>,
}

impl RoomInput {
    /// Replace one field from raw text.
    pub fn set(&mut self, field: RoomField, raw: &str) {
        match field {
            RoomField::Name => raw.clone_into(&mut self.name),
            RoomField::Capacity => self.capacity = parse_numeric(raw),
        }
    }

    fn issues(&self, index: usize, out: &mut Vec<FieldIssue>) {
        if self.name.trim().is_empty() {
            out.push(FieldIssue::Room { index, field: RoomField::Name });
        }
        if positive(self.capacity).is_none() {
            out.push(FieldIssue::Room { index, field: RoomField::Capacity });
        }
    }

    fn to_request(&self) -> Option<RoomRequest> {
        if self.name.trim().is_empty() {
            return None;
        }
        Some(RoomRequest::new(self.name.clone(), positive(self.capacity)?))
    }
}

fn positive(value: Option<i64>) -> Option<u32> {
    value
        .filter(|v| *v >= 1)
        .and_then(|v| u32::try_from(v).ok())
}

fn non_negative(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

// =============================================================================
// VALIDATION
// =============================================================================

/// A single field that failed its predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    Days,
    SlotsPerDay,
    /// Hours fall outside `MIN_HOUR <= start < end <= MAX_HOUR`.
    HourRange,
    Margin,
    Exam { index: usize, field: ExamField },
    Room { index: usize, field: RoomField },
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days => f.write_str("days must be at least 1"),
            Self::SlotsPerDay => f.write_str("slots per day must be at least 1"),
            Self::HourRange => write!(f, "hours must satisfy {MIN_HOUR} <= start < end <= {MAX_HOUR}"),
            Self::Margin => f.write_str("margin must be 0 or more"),
            Self::Exam { index, field } => write!(f, "exam {}: {field} is missing or invalid", index + 1),
            Self::Room { index, field } => write!(f, "room {}: {field} is missing or invalid", index + 1),
        }
    }
}

/// The payload was rejected; carries every failing field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schedule constraints: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        "E_VALIDATION"
    }
}

/// Every field issue in the given inputs. Pure; safe to run on each keystroke.
#[must_use]
pub fn issues(
    days: Option<i64>,
    slots_per_day: Option<i64>,
    margin: Option<i64>,
    exams: &[ExamInput],
    rooms: &[RoomInput],
) -> Vec<FieldIssue> {
    let mut out = Vec::new();
    if positive(days).is_none() {
        out.push(FieldIssue::Days);
    }
    if positive(slots_per_day).is_none() {
        out.push(FieldIssue::SlotsPerDay);
    }
    if non_negative(margin).is_none() {
        out.push(FieldIssue::Margin);
    }
    for (index, exam) in exams.iter().enumerate() {
        exam.issues(index, &mut out);
    }
    for (index, room) in rooms.iter().enumerate() {
        room.issues(index, &mut out);
    }
    out
}

/// Assemble a validated request, rejecting the whole payload on any issue.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every failing field.
pub fn build(
    days: Option<i64>,
    slots_per_day: Option<i64>,
    margin: Option<i64>,
    exams: &[ExamInput],
    rooms: &[RoomInput],
) -> Result<ScheduleConstraints, ValidationError> {
    let found = issues(days, slots_per_day, margin, exams, rooms);
    if !found.is_empty() {
        return Err(ValidationError { issues: found });
    }

    let invalid = || ValidationError { issues: Vec::new() };
    let exams = exams
        .iter()
        .map(ExamInput::to_request)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;
    let rooms = rooms
        .iter()
        .map(RoomInput::to_request)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    Ok(ScheduleConstraints::new(
        positive(days).ok_or_else(invalid)?,
        positive(slots_per_day).ok_or_else(invalid)?,
        non_negative(margin).ok_or_else(invalid)?,
        exams,
        rooms,
    ))
}

// =============================================================================
// FORM
// =============================================================================

/// Whole-form state: general parameters plus exam and room rows.
///
/// The day length comes either from an explicit `slots_per_day` (wire-shaped
/// input files) or from the `start_hour..end_hour` range, one slot per hour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScheduleForm {
    pub days: Option<i64>,
    pub start_hour: Option<i64>,
    pub end_hour: Option<i64>,
    pub slots_per_day: Option<i64>,
    pub margin: Option<i64>,
    pub exams: Vec<ExamInput>,
    pub rooms: Vec<RoomInput>,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self {
            days: Some(DEFAULT_DAYS),
            start_hour: Some(DEFAULT_START_HOUR),
            end_hour: Some(DEFAULT_END_HOUR),
            slots_per_day: None,
            margin: Some(DEFAULT_MARGIN),
            exams: vec![ExamInput::default()],
            rooms: vec![RoomInput::default()],
        }
    }
}

impl ScheduleForm {
    pub fn set_days(&mut self, raw: &str) {
        self.days = parse_numeric(raw);
    }

    pub fn set_margin(&mut self, raw: &str) {
        self.margin = parse_numeric(raw);
    }

    /// Set the hour range; clears any explicit slot count.
    pub fn set_hours(&mut self, start_hour: i64, end_hour: i64) {
        self.start_hour = Some(start_hour);
        self.end_hour = Some(end_hour);
        self.slots_per_day = None;
    }

    pub fn add_exam(&mut self) {
        self.exams.push(ExamInput::default());
    }

    pub fn remove_exam(&mut self, index: usize) -> Option<ExamInput> {
        (index < self.exams.len()).then(|| self.exams.remove(index))
    }

    /// Update one exam field in place. Returns `false` if the row does not exist.
    pub fn update_exam(&mut self, index: usize, field: ExamField, raw: &str) -> bool {
        let Some(exam) = self.exams.get_mut(index) else {
            return false;
        };
        exam.set(field, raw);
        true
    }

    pub fn add_room(&mut self) {
        self.rooms.push(RoomInput::default());
    }

    pub fn remove_room(&mut self, index: usize) -> Option<RoomInput> {
        (index < self.rooms.len()).then(|| self.rooms.remove(index))
    }

    /// Update one room field in place. Returns `false` if the row does not exist.
    pub fn update_room(&mut self, index: usize, field: RoomField, raw: &str) -> bool {
        let Some(room) = self.rooms.get_mut(index) else {
            return false;
        };
        room.set(field, raw);
        true
    }

    /// Effective slots per day, or `None` when it cannot be derived.
    #[must_use]
    pub fn slots_per_day(&self) -> Option<i64> {
        if self.slots_per_day.is_some() {
            return self.slots_per_day;
        }
        match (self.start_hour, self.end_hour) {
            (Some(start), Some(end)) if MIN_HOUR <= start && start < end && end <= MAX_HOUR => Some(end - start),
            _ => None,
        }
    }

    /// First hour of the day used for slot labels. Out-of-range hours fall
    /// back to the default start.
    #[must_use]
    pub fn first_hour(&self) -> u32 {
        self.start_hour
            .filter(|h| (MIN_HOUR..=MAX_HOUR).contains(h))
            .and_then(|h| u32::try_from(h).ok())
            .unwrap_or(8)
    }

    #[must_use]
    pub fn issues(&self) -> Vec<FieldIssue> {
        let mut found = issues(self.days, self.slots_per_day(), self.margin, &self.exams, &self.rooms);
        if self.slots_per_day.is_none() && self.slots_per_day().is_none() {
            if let Some(pos) = found.iter().position(|i| *i == FieldIssue::SlotsPerDay) {
                found[pos] = FieldIssue::HourRange;
            }
        }
        found
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }

    /// Build the request payload from the current form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when any field is invalid.
    pub fn build(&self) -> Result<ScheduleConstraints, ValidationError> {
        let found = self.issues();
        if !found.is_empty() {
            return Err(ValidationError { issues: found });
        }
        build(self.days, self.slots_per_day(), self.margin, &self.exams, &self.rooms)
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
