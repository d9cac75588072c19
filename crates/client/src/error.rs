//! Client error taxonomy.
//!
//! Mirrors the failure classes the front-end distinguishes: transport
//! failure (no response at all), an HTTP error status (response received),
//! authorization expiry (401, handled globally before the caller sees it),
//! and response-body decode failure.

use thiserror::Error;

/// Errors produced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, DNS, closed
    /// socket). Distinct from any HTTP status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status other than 401.
    /// `message` carries the server's `detail` text when present.
    #[error("API error: {status} - {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided reason, or the canonical status phrase.
        message: String,
    },

    /// The backend answered 401. The credential store has already been
    /// cleared and a login navigation issued by the time the caller sees
    /// this; callers must not assume recovery.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Server-provided reason.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A request URL could not be built from the configured base.
    #[error("invalid request path: {0}")]
    InvalidPath(String),
}

impl ApiError {
    /// Whether this error is the global authorization-expiry signal.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
