//! Optimizer transport: thin HTTP wrapper around the schedule endpoint.
//!
//! The pipeline only sees [`ScheduleTransport`], so tests drive it with
//! scripted in-memory transports. Response parsing is a pure function for the
//! same reason.

use std::time::Duration;

use crate::config::ServiceConfig;
use crate::error::ErrorCode;
use crate::model::ScheduleResponse;

// =============================================================================
// ERROR
// =============================================================================

/// A transport-level failure. Always transient from the pipeline's view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// Connection refused, DNS failure, reset, or body read failure.
    #[error("request failed: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-2xx status.
    #[error("service responded with status {status}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// Failures that look like a sleeping or booting backend.
    #[must_use]
    pub fn suggests_cold_start(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout | Self::Status { status: 502..=504, .. })
    }
}

impl ErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Network(_) => "E_TRANSPORT_NETWORK",
            Self::Timeout => "E_TRANSPORT_TIMEOUT",
            Self::Status { .. } => "E_TRANSPORT_STATUS",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() { Self::Timeout } else { Self::Network(e.to_string()) }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Sends serialized requests to the optimizer.
#[async_trait::async_trait]
pub trait ScheduleTransport: Send + Sync {
    /// POST a serialized request body and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] for network failures, timeouts and non-2xx statuses.
    async fn post_schedule(&self, body: &[u8]) -> Result<String, TransportError>;

    /// GET the service's example request, as raw JSON text.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ScheduleTransport::post_schedule`].
    async fn fetch_example(&self) -> Result<String, TransportError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
    schedule_url: String,
    example_url: String,
}

impl HttpTransport {
    /// Build a reqwest-backed transport from service config.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &ServiceConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http, schedule_url: config.schedule_url(), example_url: config.example_url() })
    }

    async fn read(response: reqwest::Response) -> Result<String, TransportError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ScheduleTransport for HttpTransport {
    async fn post_schedule(&self, body: &[u8]) -> Result<String, TransportError> {
        let response = self
            .http
            .post(&self.schedule_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body.to_vec())
            .send()
            .await?;
        Self::read(response).await
    }

    async fn fetch_example(&self) -> Result<String, TransportError> {
        let response = self
            .http
            .get(&self.example_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        Self::read(response).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a 2xx response body.
///
/// # Errors
///
/// Returns the deserializer error when the body does not match the schema.
pub fn parse_response(text: &str) -> Result<ScheduleResponse, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
