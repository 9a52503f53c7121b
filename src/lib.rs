//! Exam scheduling client.
//!
//! Collects exam-scheduling constraints, submits them to a remote optimizer
//! with retry and cancellation, and projects the returned assignments into a
//! filterable, editable day × slot × room grid.
//!
//! Data flows `builder` → `submit` → `state`, which layers `edit` over the
//! confirmed list and reads through `grid` for lookup and `export` for output.

pub mod builder;
pub mod config;
pub mod edit;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod state;
pub mod submit;

pub use builder::{ScheduleForm, ValidationError};
pub use config::{RetryPolicy, ServiceConfig};
pub use error::ErrorCode;
pub use model::{Assignment, AssignmentKey, ScheduleConstraints, ScheduleResult};
pub use state::ScheduleView;
pub use submit::{CancelToken, HttpTransport, SubmissionPipeline, SubmitError};
