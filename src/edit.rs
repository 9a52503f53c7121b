//! Edit overlay: a local draft of the assignment list.
//!
//! DESIGN
//! ======
//! A draft is a full copy of the confirmed list plus at most one open field
//! buffer. Opening a buffer while another is open discards the first; edits
//! are never stacked. Committing writes the buffer back over the entry whose
//! identity `(name, day, slot, room)` matched when the buffer was opened,
//! leaving every other entry untouched.

use std::fmt;

use crate::builder::parse_numeric;
use crate::error::ErrorCode;
use crate::model::{Assignment, AssignmentKey};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no assignment {} on day {} slot {} in room {}", .0.name, .0.day, .0.slot, .0.room)]
    NotFound(AssignmentKey),

    #[error("no field editor is open")]
    NothingOpen,

    #[error("invalid value {raw:?} for {field}")]
    InvalidValue { field: EditField, raw: String },
}

impl ErrorCode for EditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_EDIT_NOT_FOUND",
            Self::NothingOpen => "E_EDIT_NOTHING_OPEN",
            Self::InvalidValue { .. } => "E_EDIT_INVALID_VALUE",
        }
    }
}

/// An editable assignment field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Filiere,
    Promotion,
    Day,
    Slot,
    Room,
}

impl fmt::Display for EditField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Filiere => "filiere",
            Self::Promotion => "promotion",
            Self::Day => "day",
            Self::Slot => "slot",
            Self::Room => "room",
        })
    }
}

// =============================================================================
// FIELD BUFFER
// =============================================================================

/// Working copy of one assignment, keyed by its identity at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBuffer {
    origin: AssignmentKey,
    value: Assignment,
}

impl FieldBuffer {
    #[must_use]
    pub fn origin(&self) -> &AssignmentKey {
        &self.origin
    }

    #[must_use]
    pub fn value(&self) -> &Assignment {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Assignment {
        &mut self.value
    }

    /// Set one field from raw text. Text fields must be non-blank and numeric
    /// fields must parse; promotion must be at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidValue`] and leaves the buffer unchanged.
    pub fn set(&mut self, field: EditField, raw: &str) -> Result<(), EditError> {
        let invalid = || EditError::InvalidValue { field, raw: raw.to_owned() };
        let text = || Some(raw.trim()).filter(|s| !s.is_empty()).map(str::to_owned);
        let number = || parse_numeric(raw).and_then(|n| u32::try_from(n).ok());
        match field {
            EditField::Name => self.value.name = text().ok_or_else(invalid)?,
            EditField::Filiere => self.value.filiere = text().ok_or_else(invalid)?,
            EditField::Room => self.value.room = text().ok_or_else(invalid)?,
            EditField::Promotion => self.value.promotion = number().filter(|p| *p >= 1).ok_or_else(invalid)?,
            EditField::Day => self.value.day = number().ok_or_else(invalid)?,
            EditField::Slot => self.value.slot = number().ok_or_else(invalid)?,
        }
        Ok(())
    }
}

// =============================================================================
// DRAFT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    assignments: Vec<Assignment>,
    open: Option<FieldBuffer>,
}

impl EditDraft {
    /// Start a draft from the confirmed list.
    #[must_use]
    pub fn begin(assignments: &[Assignment]) -> Self {
        Self { assignments: assignments.to_vec(), open: None }
    }

    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[must_use]
    pub fn buffer(&self) -> Option<&FieldBuffer> {
        self.open.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut FieldBuffer> {
        self.open.as_mut()
    }

    /// Open an editor on the entry identified by `key`, closing any open one.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NotFound`] if no entry has that identity; any
    /// previously open buffer is still discarded.
    pub fn open_field(&mut self, key: &AssignmentKey) -> Result<&mut FieldBuffer, EditError> {
        self.open = None;
        let value = self
            .assignments
            .iter()
            .find(|a| a.matches_key(key))
            .cloned()
            .ok_or_else(|| EditError::NotFound(key.clone()))?;
        Ok(self.open.insert(FieldBuffer { origin: key.clone(), value }))
    }

    /// Discard the open buffer. Returns whether one was open.
    pub fn cancel_field(&mut self) -> bool {
        self.open.take().is_some()
    }

    /// Merge the open buffer back into the draft and close it.
    ///
    /// Returns the entry's identity after the edit.
    ///
    /// # Errors
    ///
    /// [`EditError::NothingOpen`] without an open buffer, or
    /// [`EditError::NotFound`] if the original entry is gone.
    pub fn commit_field(&mut self) -> Result<AssignmentKey, EditError> {
        let buffer = self.open.take().ok_or(EditError::NothingOpen)?;
        let slot = self
            .assignments
            .iter_mut()
            .find(|a| a.matches_key(&buffer.origin))
            .ok_or_else(|| EditError::NotFound(buffer.origin.clone()))?;
        *slot = buffer.value;
        Ok(slot.key())
    }

    /// Promote the draft to the new list. An uncommitted buffer is dropped.
    #[must_use]
    pub fn end(self) -> Vec<Assignment> {
        self.assignments
    }
}

#[cfg(test)]
#[path = "edit_test.rs"]
mod tests;
