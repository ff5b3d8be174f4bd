//! Error types for the suggestion API client.
//!
//! # Design
//! Local failures (`Configuration`, `MalformedRequest`) are raised before any
//! network call. Every status the upstream service documents has its own
//! variant carrying the status code and raw body; anything else lands in
//! `UnexpectedStatus`. No variant is retried by the client.

use thiserror::Error;

use crate::http::TransportError;

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by `SuggestionApi` and `SuggestionClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client could not be constructed (missing or empty token, bad env).
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A local precondition failed; nothing was sent.
    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    /// The transport could not complete the round-trip.
    #[error("http exception: {message}")]
    TransportError { message: String },

    /// A 200 response whose body is not the expected JSON.
    #[error("error parsing response: {message}")]
    ResponseParseError { message: String },

    /// A well-formed 200 response with no suggestions.
    #[error("empty result")]
    EmptyResult,

    #[error("incorrect request (HTTP {status}): {body}")]
    InvalidRequest { status: u16, body: String },

    #[error("missing API key (HTTP {status})")]
    MissingApiKey { status: u16, body: String },

    #[error("incorrect API key (HTTP {status})")]
    InvalidApiKey { status: u16, body: String },

    #[error("request method must be POST (HTTP {status})")]
    MethodNotAllowed { status: u16, body: String },

    #[error("request exceeds the suggestion limits (HTTP {status})")]
    RateOrSizeLimitExceeded { status: u16, body: String },

    #[error("server internal error (HTTP {status})")]
    UpstreamInternalError { status: u16, body: String },

    #[error("unexpected status (HTTP {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl ApiError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedRequest {
            message: message.into(),
        }
    }

    /// Map a non-200 status to its error kind.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => ApiError::InvalidRequest { status, body },
            401 => ApiError::MissingApiKey { status, body },
            403 => ApiError::InvalidApiKey { status, body },
            405 => ApiError::MethodNotAllowed { status, body },
            413 => ApiError::RateOrSizeLimitExceeded { status, body },
            500 => ApiError::UpstreamInternalError { status, body },
            _ => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status for status-mapped errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InvalidRequest { status, .. }
            | ApiError::MissingApiKey { status, .. }
            | ApiError::InvalidApiKey { status, .. }
            | ApiError::MethodNotAllowed { status, .. }
            | ApiError::RateOrSizeLimitExceeded { status, .. }
            | ApiError::UpstreamInternalError { status, .. }
            | ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::TransportError {
            message: err.message,
        }
    }
}
