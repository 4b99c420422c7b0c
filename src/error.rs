// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system. Each
//! variant tells what went wrong and where, and [`AppError::category`]
//! groups them into the coarse families the traversal reacts to.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`, the
/// domain vocabulary is encoded in the type system so retry decisions
/// don't depend on stringly-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded: back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Coarse failure families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Non-2xx status, network fault, or timeout.
    Transport,
    /// Malformed body, timestamp, or missing required field.
    Parse,
    /// Missing credential or unusable root identifier.
    Configuration,
    /// The block tree exceeded the depth guard.
    Traversal,
    /// Local I/O while delivering the report.
    Output,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Configuration => "configuration",
            Self::Traversal => "traversal",
            Self::Output => "output",
        };
        f.write_str(name)
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {endpoint} timed out after {after:?}")]
    Timeout { endpoint: String, after: Duration },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Block {block_id} has an invalid last_edited_time {value:?}: {reason}")]
    InvalidTimestamp {
        block_id: String,
        value: String,
        reason: String,
    },

    #[error("Maximum recursion depth ({0}) exceeded")]
    RecursionLimitExceeded(usize),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The failure family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkFailure(_) | Self::NotionService { .. } | Self::Timeout { .. } => {
                ErrorCategory::Transport
            }
            Self::MalformedResponse(_) | Self::InvalidTimestamp { .. } => ErrorCategory::Parse,
            Self::MissingConfiguration(_) | Self::Validation(_) => ErrorCategory::Configuration,
            Self::RecursionLimitExceeded(_) | Self::Internal(_) => ErrorCategory::Traversal,
            Self::Io(_) => ErrorCategory::Output,
        }
    }

    /// Whether a fresh attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotionService { code, .. } => code.is_retryable(),
            Self::Timeout { .. } => true,
            Self::NetworkFailure(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
