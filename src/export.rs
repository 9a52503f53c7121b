//! Export surface: structured JSON download and a paginated text grid.
//!
//! Both exports read the list the view is currently showing, which may be a
//! promoted draft or a filtered subset of the server result.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ErrorCode;
use crate::grid::labels::{day_label, promotion_name, slot_label};
use crate::grid::{CoverageResolver, ScheduleIndex};
use crate::model::Assignment;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("days per page must be at least 1")]
    PageSize,

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PageSize => "E_EXPORT_PAGE_SIZE",
            Self::Serialize(_) => "E_EXPORT_SERIALIZE",
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    days: u32,
    slots_per_day: u32,
    start_hour: u32,
    total_period: u32,
    exam_count: usize,
    assignments: &'a [Assignment],
}

/// Grid dimensions carried alongside an exported list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub days: u32,
    pub slots_per_day: u32,
    pub start_hour: u32,
    pub total_period: u32,
}

/// Pretty-printed JSON of `assignments` with the grid shape.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if serialization fails.
pub fn to_json(assignments: &[Assignment], shape: GridShape) -> Result<String, ExportError> {
    let doc = ExportDocument {
        days: shape.days,
        slots_per_day: shape.slots_per_day,
        start_hour: shape.start_hour,
        total_period: shape.total_period,
        exam_count: assignments.len(),
        assignments,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

// =============================================================================
// TEXT GRID
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub start_hour: u32,
    pub total_period: u32,
    pub days_per_page: u32,
    /// Names only; omit filière and promotion.
    pub compact: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { start_hour: 8, total_period: 0, days_per_page: 1, compact: false }
    }
}

const CONTINUATION: &str = "^ ";
const SLOT_HEADER: &str = "Horaire";

/// Render the grid as text, `days_per_page` day tables per page.
///
/// Cells list the exams starting there; cells covered by an earlier exam's
/// span show its name prefixed with `^`. Assignments outside the declared
/// grid are counted in a note on the last page.
///
/// # Errors
///
/// Returns [`ExportError::PageSize`] when `days_per_page` is zero.
pub fn render_pages(
    index: &ScheduleIndex,
    resolver: &CoverageResolver,
    options: &RenderOptions,
) -> Result<Vec<String>, ExportError> {
    if options.days_per_page == 0 {
        return Err(ExportError::PageSize);
    }

    let days: Vec<u32> = (0..index.days()).collect();
    let chunks: Vec<&[u32]> = if days.is_empty() {
        vec![days.as_slice()]
    } else {
        days.chunks(options.days_per_page as usize).collect()
    };
    let page_count = chunks.len();
    let stray = index.out_of_range().len();

    let mut pages = Vec::with_capacity(page_count);
    for (number, chunk) in chunks.into_iter().enumerate() {
        let mut page = format!(
            "{} exams scheduled, total period {} (page {}/{})\n",
            index.len(),
            options.total_period,
            number + 1,
            page_count
        );
        for &day in chunk {
            page.push('\n');
            render_day(&mut page, index, resolver, options, day);
        }
        if number + 1 == page_count && stray > 0 {
            page.push_str(&format!("\n{stray} assignment(s) fall outside the grid\n"));
        }
        pages.push(page);
    }
    Ok(pages)
}

fn render_day(out: &mut String, index: &ScheduleIndex, resolver: &CoverageResolver, options: &RenderOptions, day: u32) {
    let rooms = index.rooms();
    let slots = index.slots_per_day();

    let mut continued: HashMap<(u32, usize), Vec<String>> = HashMap::new();
    for (d, _, room, list) in index.populated() {
        if d != day {
            continue;
        }
        let Some(pos) = index.room_position(room) else { continue };
        for assignment in list {
            for cell in resolver.covered_cells(assignment).into_iter().skip(1) {
                if cell.slot < slots {
                    continued
                        .entry((cell.slot, pos))
                        .or_default()
                        .push(format!("{CONTINUATION}{}", assignment.name));
                }
            }
        }
    }

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(slots as usize + 1);
    let mut header = vec![SLOT_HEADER.to_owned()];
    header.extend(rooms.iter().cloned());
    rows.push(header);
    for slot in 0..slots {
        let mut row = vec![slot_label(slot, options.start_hour)];
        for (pos, room) in rooms.iter().enumerate() {
            let mut entries: Vec<String> = index
                .cell(day, slot, room)
                .iter()
                .map(|a| cell_text(a, options.compact))
                .collect();
            if let Some(more) = continued.get(&(slot, pos)) {
                entries.extend(more.iter().cloned());
            }
            row.push(entries.join(" / "));
        }
        rows.push(row);
    }

    let widths: Vec<usize> = (0..=rooms.len())
        .map(|col| rows.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
        .collect();

    out.push_str(&day_label(day));
    out.push('\n');
    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{text:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn cell_text(assignment: &Assignment, compact: bool) -> String {
    if compact {
        assignment.name.clone()
    } else {
        format!(
            "{} ({}, {})",
            assignment.name,
            assignment.filiere,
            promotion_name(assignment.promotion)
        )
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
