//! View-owned schedule state.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`ScheduleView`] holds the last server-confirmed assignment list, the
//! optional edit draft layered over it, the active filter, and transient
//! interaction state (hovered entry, last notice). Every read goes through
//! the displayed list: the draft while editing, the confirmed list otherwise.
//!
//! The schedule index is cached per list version. Anything that changes the
//! displayed or visible list bumps the version; repeated cell queries between
//! changes hit the same index.

use tracing::debug;

use crate::edit::{EditDraft, EditError, FieldBuffer};
use crate::export::{self, ExportError, GridShape, RenderOptions};
use crate::grid::{Cell, Conflict, CoverageResolver, FilterCriteria, ScheduleIndex, conflicts, filter};
use crate::model::{Assignment, AssignmentKey, ScheduleConstraints, ScheduleResult};
use crate::submit::SubmitError;

/// Count and makespan shown above the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub exam_count: usize,
    pub total_period: u32,
}

#[derive(Debug, Default)]
struct CachedIndex {
    built_for: Option<u64>,
    index: ScheduleIndex,
}

#[derive(Debug)]
pub struct ScheduleView {
    confirmed: Vec<Assignment>,
    days: u32,
    slots_per_day: u32,
    start_hour: u32,
    total_period: u32,
    resolver: CoverageResolver,
    draft: Option<EditDraft>,
    criteria: FilterCriteria,
    /// Hovered entry, if any.
    hovered: Option<AssignmentKey>,
    /// Names-only rendering.
    pub compact: bool,
    notice: Option<String>,
    version: u64,
    cache: CachedIndex,
}

impl Default for ScheduleView {
    fn default() -> Self {
        Self::new(8)
    }
}

impl ScheduleView {
    #[must_use]
    pub fn new(start_hour: u32) -> Self {
        Self {
            confirmed: Vec::new(),
            days: 0,
            slots_per_day: 0,
            start_hour,
            total_period: 0,
            resolver: CoverageResolver::single_slot(),
            draft: None,
            criteria: FilterCriteria::default(),
            hovered: None,
            compact: false,
            notice: None,
            version: 0,
            cache: CachedIndex::default(),
        }
    }

    // =========================================================================
    // SUBMISSION OUTCOME
    // =========================================================================

    /// Replace the confirmed list with a successful result.
    ///
    /// Durations are re-joined from `constraints` by exam name. Any open draft
    /// and hover are dropped since they refer to the previous list.
    pub fn apply_result(&mut self, constraints: &ScheduleConstraints, result: ScheduleResult) {
        self.days = constraints.days();
        self.slots_per_day = constraints.slots_per_day();
        self.resolver = CoverageResolver::from_exams(constraints.exams()).with_day_length(self.slots_per_day);
        self.total_period = result.total_period;
        self.confirmed = result.assignments;
        self.draft = None;
        self.hovered = None;
        self.notice = None;
        self.touch();
    }

    /// Apply a terminal outcome. Failures keep the previous list and set the
    /// notice; a cancelled submission changes nothing.
    pub fn apply_outcome(&mut self, constraints: &ScheduleConstraints, outcome: Result<ScheduleResult, SubmitError>) {
        match outcome {
            Ok(result) => self.apply_result(constraints, result),
            Err(SubmitError::Cancelled) => {}
            Err(err) => self.notice = Some(err.user_message()),
        }
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// The last server-confirmed (or last promoted) list.
    #[must_use]
    pub fn confirmed(&self) -> &[Assignment] {
        &self.confirmed
    }

    /// Draft while editing, confirmed list otherwise.
    #[must_use]
    pub fn displayed(&self) -> &[Assignment] {
        self.draft
            .as_ref()
            .map_or(self.confirmed.as_slice(), EditDraft::assignments)
    }

    /// The displayed list narrowed by the active filter.
    #[must_use]
    pub fn visible(&self) -> Vec<Assignment> {
        filter(self.displayed(), &self.criteria)
    }

    /// Index over the visible list, rebuilt only when the list has changed.
    pub fn index(&mut self) -> &ScheduleIndex {
        if self.cache.built_for != Some(self.version) {
            debug!(version = self.version, "rebuilding schedule index");
            let index = ScheduleIndex::build(&self.visible(), self.days, self.slots_per_day);
            self.cache = CachedIndex { built_for: Some(self.version), index };
        }
        &self.cache.index
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary { exam_count: self.displayed().len(), total_period: self.total_period }
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        GridShape {
            days: self.days,
            slots_per_day: self.slots_per_day,
            start_hour: self.start_hour,
            total_period: self.total_period,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &CoverageResolver {
        &self.resolver
    }

    /// Cells claimed by more than one exam in the displayed list.
    #[must_use]
    pub fn conflicts(&self) -> Vec<Conflict> {
        conflicts(self.displayed(), &self.resolver)
    }

    // =========================================================================
    // FILTER / HOVER
    // =========================================================================

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.touch();
        }
    }

    pub fn hover(&mut self, key: Option<AssignmentKey>) {
        self.hovered = key;
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&AssignmentKey> {
        self.hovered.as_ref()
    }

    /// Whether `assignment` is the hovered entry, compared by name, day and slot.
    #[must_use]
    pub fn is_hovered(&self, assignment: &Assignment) -> bool {
        self.hovered
            .as_ref()
            .is_some_and(|k| k.name == assignment.name && k.day == assignment.day && k.slot == assignment.slot)
    }

    /// Cells spanned by the hovered assignment; empty when nothing is hovered
    /// or it is no longer displayed.
    #[must_use]
    pub fn highlighted_cells(&self) -> Vec<Cell> {
        self.hovered_assignment()
            .map(|a| self.resolver.covered_cells(a))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_highlighted(&self, day: u32, slot: u32, room: &str) -> bool {
        self.hovered_assignment()
            .is_some_and(|a| self.resolver.covers(a, day, slot, room))
    }

    fn hovered_assignment(&self) -> Option<&Assignment> {
        let key = self.hovered.as_ref()?;
        self.displayed().iter().find(|a| a.matches_key(key))
    }

    // =========================================================================
    // EDITING
    // =========================================================================

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Enter edit mode. No-op if a draft is already open.
    pub fn begin_edit(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(EditDraft::begin(&self.confirmed));
            self.touch();
        }
    }

    /// Open a field editor, entering edit mode if needed.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NotFound`] if `key` matches no displayed entry.
    pub fn open_field(&mut self, key: &AssignmentKey) -> Result<&mut FieldBuffer, EditError> {
        self.begin_edit();
        self.draft_mut().open_field(key)
    }

    pub fn buffer_mut(&mut self) -> Option<&mut FieldBuffer> {
        self.draft.as_mut().and_then(EditDraft::buffer_mut)
    }

    /// Merge the open buffer into the draft.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NothingOpen`] when not editing or nothing is open.
    pub fn commit_field(&mut self) -> Result<AssignmentKey, EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NothingOpen)?;
        let key = draft.commit_field()?;
        if self.hovered.as_ref().is_some_and(|h| !self.displayed().iter().any(|a| a.matches_key(h))) {
            self.hovered = None;
        }
        self.touch();
        Ok(key)
    }

    pub fn cancel_field(&mut self) -> bool {
        self.draft.as_mut().is_some_and(EditDraft::cancel_field)
    }

    /// Promote the draft to the confirmed list. Returns false when not editing.
    pub fn end_edit(&mut self) -> bool {
        let Some(draft) = self.draft.take() else {
            return false;
        };
        self.confirmed = draft.end();
        self.touch();
        true
    }

    /// Discard the draft, reverting to the confirmed list.
    pub fn cancel_edit(&mut self) -> bool {
        let discarded = self.draft.take().is_some();
        if discarded {
            self.touch();
        }
        discarded
    }

    fn draft_mut(&mut self) -> &mut EditDraft {
        self.draft.get_or_insert_with(|| EditDraft::begin(&self.confirmed))
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// JSON of the visible list.
    ///
    /// # Errors
    ///
    /// Propagates [`ExportError`] from serialization.
    pub fn export_json(&self) -> Result<String, ExportError> {
        export::to_json(&self.visible(), self.shape())
    }

    /// Paginated text grid of the visible list.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::PageSize`] when `days_per_page` is zero.
    pub fn render_pages(&mut self, days_per_page: u32) -> Result<Vec<String>, ExportError> {
        let options = RenderOptions {
            start_hour: self.start_hour,
            total_period: self.total_period,
            days_per_page,
            compact: self.compact,
        };
        let resolver = self.resolver.clone();
        export::render_pages(self.index(), &resolver, &options)
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
