//! Error classification for remote calls.
//!
//! Every failed attempt is classified as either retryable (network-level
//! failures and deliberately injected test faults) or terminal (everything
//! else). The retry loop only repeats retryable failures.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// Whether a failed attempt may be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connect/timeout/body-read failure below the HTTP layer.
    Network,
    /// The server flagged the error as an injected test fault.
    InjectedFault,
    /// Non-2xx status, genuine error payload, or an unparseable body.
    Terminal,
}

/// Error produced by a single remote attempt, or by the retry loop once it
/// gives up.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: FailureKind,
    /// HTTP status code, if a response was received
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            status: None,
            message: message.into(),
        }
    }

    pub fn injected(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            kind: FailureKind::InjectedFault,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn terminal(message: impl Into<String>, status: Option<StatusCode>) -> Self {
        Self {
            kind: FailureKind::Terminal,
            status,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, FailureKind::Network | FailureKind::InjectedFault)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status.as_u16()),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::network(format!("request failed: {err}"))
    }
}

/// Shape of an error payload. `error` and `detail` are both in use across
/// API revisions.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<serde_json::Value>,
    detail: Option<serde_json::Value>,
    #[serde(default)]
    is_test_error: bool,
}

impl ErrorPayload {
    fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .or(self.detail.as_ref())
            .filter(|v| !v.is_null())
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }
}

/// Turn a raw response into a JSON value, or the classified failure.
///
/// Order matters: an injected test fault is retryable whatever the status code;
/// any other error object or non-2xx status is terminal.
pub fn classify_response(status: StatusCode, body: &str) -> Result<serde_json::Value, ApiError> {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    if let Some(value) = parsed.as_ref().filter(|v| v.is_object())
        && let Ok(payload) = serde_json::from_value::<ErrorPayload>(value.clone())
        && let Some(message) = payload.message()
    {
        if payload.is_test_error {
            return Err(ApiError::injected(
                format!("injected test fault: {message}"),
                status,
            ));
        }
        return Err(ApiError::terminal(message, Some(status)));
    }

    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("Unknown");
        return Err(ApiError::terminal(
            format!("server responded {reason}"),
            Some(status),
        ));
    }

    parsed.ok_or_else(|| ApiError::terminal("response body is not valid JSON", Some(status)))
}
