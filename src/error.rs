//! Error types for the monitoring API client and live channel.

use thiserror::Error;

/// Errors returned by REST calls against the monitoring API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// The request never completed (DNS, connect, abort).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request hit its client-side deadline.
    #[error("Request timed out")]
    Timeout,

    /// The response body was not the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// An alert-resolve mutation failed.
///
/// Kept separate from [`ApiError`] so callers can distinguish "the alert was
/// not resolved" from ordinary read failures and leave local state untouched.
#[derive(Debug, Error)]
#[error("Failed to resolve alert {alert_id}: {source}")]
pub struct ResolveError {
    pub alert_id: i64,
    #[source]
    pub source: ApiError,
}

/// Errors on the live (WebSocket) channel.
///
/// These never escape to dashboard consumers as panics or results; the
/// connection manager converts them into connection-state changes.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Connection closed: {0}")]
    Closed(String),
}
