//! Submission pipeline: one validated payload in, exactly one outcome out.
//!
//! DESIGN
//! ======
//! A submission moves through
//! `Idle → Submitting → (RetryWaiting → Submitting)* → Succeeded | Failed`.
//! The payload is serialized once and the same bytes are sent on every
//! attempt. Transport failures are retried with linear backoff up to
//! `RetryPolicy::max_retries`; application rejections and malformed bodies
//! are terminal on first sight.
//!
//! The busy flag is held by an RAII guard for the whole submission, so it is
//! released exactly once whichever terminal path runs, and a second submit
//! while it is held is refused rather than queued.
//!
//! CANCELLATION
//! ============
//! Every suspension point (request, backoff sleep) races the caller's
//! [`CancelToken`]. A cancelled submission delivers no terminal event.

pub mod cancel;
pub mod transport;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::RetryPolicy;
use crate::error::ErrorCode;
use crate::model::{ResponseStatus, ScheduleConstraints, ScheduleResult};
pub use cancel::{CancelToken, DropGuard};
pub use transport::{HttpTransport, ScheduleTransport, TransportError};

pub const COLD_START_MESSAGE: &str = "Unable to reach the scheduling service. The server may be starting up after a \
     period of inactivity, which can take up to a minute; please try again shortly.";
pub const GENERIC_REJECTION: &str = "An error occurred while generating the schedule.";
const INCOMPLETE_SUCCESS: &str = "success response without results or total_period";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    Busy,

    #[error("request serialization failed: {0}")]
    Serialize(String),

    #[error("service unreachable after {attempts} attempts: {last}")]
    Unreachable { attempts: u32, last: TransportError },

    #[error("service rejected the request: {message}")]
    Rejected { message: String },

    #[error("malformed service response: {0}")]
    Malformed(String),

    #[error("submission cancelled")]
    Cancelled,
}

impl SubmitError {
    /// The single human-readable notification for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Busy => "A schedule is already being generated.".to_owned(),
            Self::Serialize(_) => "The request could not be prepared.".to_owned(),
            Self::Unreachable { last, .. } if last.suggests_cold_start() => COLD_START_MESSAGE.to_owned(),
            Self::Unreachable { last, .. } => {
                format!("The scheduling service could not handle the request ({last}). Please try again later.")
            }
            Self::Rejected { message } => message.clone(),
            Self::Malformed(_) => "The scheduling service returned an unexpected response.".to_owned(),
            Self::Cancelled => "Schedule generation was cancelled.".to_owned(),
        }
    }
}

impl ErrorCode for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy => "E_BUSY",
            Self::Serialize(_) => "E_SERIALIZE",
            Self::Unreachable { .. } => "E_UNREACHABLE",
            Self::Rejected { .. } => "E_REJECTED",
            Self::Malformed(_) => "E_MALFORMED",
            Self::Cancelled => "E_CANCELLED",
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Submitting { attempt: u32 },
    RetryWaiting { retry: u32, delay: Duration },
    Succeeded,
    Failed,
    Cancelled,
}

/// Progress reported to the caller. `Retrying` may repeat; exactly one of
/// `Succeeded`/`Failed` ends a submission that was not cancelled.
#[derive(Debug)]
pub enum SubmitEvent<'a> {
    Retrying { retry: u32, max_retries: u32, delay: Duration, error: &'a TransportError },
    Succeeded(&'a ScheduleResult),
    Failed(&'a SubmitError),
}

/// Notification sink supplied by the owning view (toasts, progress text).
pub trait SubmitObserver: Send + Sync {
    fn on_event(&self, event: &SubmitEvent<'_>);
}

// =============================================================================
// BUSY FLAG
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

pub struct SubmissionPipeline {
    transport: Arc<dyn ScheduleTransport>,
    policy: RetryPolicy,
    busy: BusyFlag,
    state: Arc<Mutex<PipelineState>>,
}

impl SubmissionPipeline {
    #[must_use]
    pub fn new(transport: Arc<dyn ScheduleTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy, busy: BusyFlag::default(), state: Arc::new(Mutex::new(PipelineState::Idle)) }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: PipelineState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Submit `constraints` and resolve to the single terminal outcome.
    ///
    /// The same outcome is delivered to `observer` as `Succeeded`/`Failed`
    /// before this returns, unless the submission was cancelled.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Busy`] if another submission holds the busy flag (no events).
    /// - [`SubmitError::Cancelled`] if `cancel` fired first (no terminal event).
    /// - Otherwise the terminal failure that was reported to `observer`.
    pub async fn submit(
        &self,
        constraints: &ScheduleConstraints,
        observer: &dyn SubmitObserver,
        cancel: &CancelToken,
    ) -> Result<ScheduleResult, SubmitError> {
        let Some(_busy) = self.busy.try_acquire() else {
            warn!("submission refused; another submission is in progress");
            return Err(SubmitError::Busy);
        };

        let outcome = match constraints.to_wire() {
            Ok(body) => self.run(&body, observer, cancel).await,
            Err(e) => Err(SubmitError::Serialize(e.to_string())),
        };
        self.finish(outcome, observer, cancel)
    }

    /// Fetch the service's example request body.
    ///
    /// # Errors
    ///
    /// Returns the transport failure; no retries are attempted.
    pub async fn fetch_example(&self) -> Result<String, TransportError> {
        self.transport.fetch_example().await
    }

    async fn run(
        &self,
        body: &[u8],
        observer: &dyn SubmitObserver,
        cancel: &CancelToken,
    ) -> Result<ScheduleResult, SubmitError> {
        let max_attempts = self.policy.max_attempts();
        let mut retry = 0;
        loop {
            let attempt = retry + 1;
            self.set_state(PipelineState::Submitting { attempt });
            info!(attempt, max_attempts, bytes = body.len(), "submitting schedule request");

            let sent = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SubmitError::Cancelled),
                sent = self.transport.post_schedule(body) => sent,
            };

            let error = match sent {
                Ok(text) => return interpret(&text),
                Err(e) => e,
            };

            if retry >= self.policy.max_retries {
                return Err(SubmitError::Unreachable { attempts: attempt, last: error });
            }
            if cancel.is_cancelled() {
                return Err(SubmitError::Cancelled);
            }

            retry += 1;
            let delay = self.policy.delay_for(retry);
            warn!(
                error = %error,
                code = error.error_code(),
                retry,
                max_retries = self.policy.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "schedule request failed; retrying"
            );
            self.set_state(PipelineState::RetryWaiting { retry, delay });
            observer.on_event(&SubmitEvent::Retrying {
                retry,
                max_retries: self.policy.max_retries,
                delay,
                error: &error,
            });

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SubmitError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn finish(
        &self,
        outcome: Result<ScheduleResult, SubmitError>,
        observer: &dyn SubmitObserver,
        cancel: &CancelToken,
    ) -> Result<ScheduleResult, SubmitError> {
        if cancel.is_cancelled() || matches!(outcome, Err(SubmitError::Cancelled)) {
            info!("schedule submission cancelled");
            self.set_state(PipelineState::Cancelled);
            return Err(SubmitError::Cancelled);
        }

        match &outcome {
            Ok(result) => {
                info!(
                    assignments = result.assignments.len(),
                    total_period = result.total_period,
                    "schedule generated"
                );
                self.set_state(PipelineState::Succeeded);
                observer.on_event(&SubmitEvent::Succeeded(result));
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "schedule submission failed");
                self.set_state(PipelineState::Failed);
                observer.on_event(&SubmitEvent::Failed(e));
            }
        }
        outcome
    }
}

fn interpret(text: &str) -> Result<ScheduleResult, SubmitError> {
    let response = transport::parse_response(text).map_err(|e| SubmitError::Malformed(e.to_string()))?;
    match response.status {
        ResponseStatus::Success => response
            .into_result()
            .ok_or_else(|| SubmitError::Malformed(INCOMPLETE_SUCCESS.to_owned())),
        ResponseStatus::Error => Err(SubmitError::Rejected {
            message: response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_REJECTION.to_owned()),
        }),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
