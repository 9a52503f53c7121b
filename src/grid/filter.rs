//! Filter engine: stable AND of optional criteria over assignments.

use crate::model::Assignment;

/// Independent, optional criteria. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub text: Option<String>,
    pub filiere: Option<String>,
    pub promotion: Option<u32>,
}

impl FilterCriteria {
    /// Build criteria from raw inputs, dropping blank values.
    #[must_use]
    pub fn new(text: Option<&str>, filiere: Option<&str>, promotion: Option<u32>) -> Self {
        Self { text: non_blank(text), filiere: non_blank(filiere), promotion }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.filiere.is_none() && self.promotion.is_none()
    }

    /// Text matches exam name or room name, case-insensitively.
    #[must_use]
    pub fn matches(&self, assignment: &Assignment) -> bool {
        let text_ok = self.text.as_deref().map_or(true, |needle| {
            let needle = needle.to_lowercase();
            assignment.name.to_lowercase().contains(&needle) || assignment.room.to_lowercase().contains(&needle)
        });
        let filiere_ok = self
            .filiere
            .as_deref()
            .map_or(true, |f| assignment.filiere == f);
        let promotion_ok = self.promotion.map_or(true, |p| assignment.promotion == p);
        text_ok && filiere_ok && promotion_ok
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Assignments matching every supplied criterion, in their original order.
#[must_use]
pub fn filter(assignments: &[Assignment], criteria: &FilterCriteria) -> Vec<Assignment> {
    if criteria.is_empty() {
        return assignments.to_vec();
    }
    assignments
        .iter()
        .filter(|a| criteria.matches(a))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
