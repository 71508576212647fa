//! Error types for cursorkit
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Only [`Error::RemoteService`] is subject to the
//! [`ErrorPolicy`](crate::policy::ErrorPolicy). Transport collaborators
//! produce the raw HTTP variants; the query executor folds them into
//! `RemoteService` together with the query that failed.

use crate::types::Method;
use thiserror::Error;

/// The main error type for cursorkit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ============================================================================
    // Remote Errors
    // ============================================================================
    #[error("{method} {query} failed{}: {message}", status_suffix(.status))]
    RemoteService {
        query: String,
        method: Method,
        status: Option<u16>,
        message: String,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Transport error: {message}")]
    Transport { message: String },

    // ============================================================================
    // Deserialization Errors
    // ============================================================================
    #[error("Failed to deserialize response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to convert field '{field}': {message}")]
    Conversion { field: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with HTTP {s}")).unwrap_or_default()
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a remote service error
    pub fn remote(
        query: impl Into<String>,
        method: Method,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteService {
            query: query.into(),
            method,
            status,
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a field conversion error
    pub fn conversion(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is a remote service failure (policy-gated)
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteService { .. })
    }

    /// Check if this error was raised by a transport before normalization
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::HttpStatus { .. }
                | Error::RateLimited { .. }
                | Error::Timeout { .. }
                | Error::Transport { .. }
        )
    }

    /// Check if this error means a payload did not match the requested shape
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Error::Json(_) | Error::Conversion { .. })
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteService { status, .. } => *status,
            Error::HttpStatus { status, .. } => Some(*status),
            Error::RateLimited { .. } => Some(429),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Fold a transport failure into a `RemoteService` error for `query`.
    ///
    /// Errors that are not transport failures are returned unchanged.
    pub fn into_remote(self, query: &str, method: Method) -> Self {
        if !self.is_transport() {
            return self;
        }
        let status = self.status();
        let message = match self {
            Error::HttpStatus { body, .. } if !body.is_empty() => body,
            other => other.to_string(),
        };
        Self::remote(query, method, status, message)
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524)
}

/// Result type alias for cursorkit
pub type Result<T> = std::result::Result<T, Error>;
