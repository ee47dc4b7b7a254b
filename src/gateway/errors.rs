//! gateway::errors
//!
//! Errors from the request pipeline.

use thiserror::Error;

/// Errors from gateway operations.
///
/// A 401 that survives the single retry surfaces as
/// [`GatewayError::Unauthorized`]; the session has already been refreshed
/// or cleared by then.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The server rejected the request after the retry.
    #[error("not authorized. Run 'triage login'.")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}
