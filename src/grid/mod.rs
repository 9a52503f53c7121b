//! Schedule projection: turns the optimizer's flat assignment list into a
//! queryable day × slot × room grid.
//!
//! - `index`: materialized cell lookup plus room/filière/promotion sets
//! - `coverage`: cells spanned by an assignment, and overlaps between spans
//! - `filter`: text / filière / promotion narrowing
//! - `labels`: header and cell text

pub mod coverage;
pub mod filter;
pub mod index;
pub mod labels;

pub use coverage::{Cell, Conflict, CoverageResolver, conflicts};
pub use filter::{FilterCriteria, filter};
pub use index::ScheduleIndex;
