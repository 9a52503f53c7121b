//! Error codes shared by every error enum in the crate.
//!
//! Each concern keeps its own `thiserror` enum; this trait gives them a
//! grepable code and a retryable flag so callers can log and branch without
//! matching on concrete variants.

/// Grepable error code and retryable flag for structured error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
