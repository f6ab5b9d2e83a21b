//! Unified error types for edgemgmt.
//!
//! Defines [`EdgeError`] (the main crate error enum), [`RemoteError`] for
//! non-accepted responses from the management API, and [`ValidationError`]
//! for profile validation failures. All use `thiserror` for `Display` and
//! `Error` derives.

use std::path::PathBuf;

use http::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

/// A response whose status was outside the accepted set for the operation.
///
/// `result` holds the error body as sent by the management API, parsed as
/// JSON when possible and kept as a JSON string otherwise.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status}: {}", self.describe())]
pub struct RemoteError {
    pub status: StatusCode,
    pub result: serde_json::Value,
}

impl RemoteError {
    /// The remote diagnostic text, e.g. `Target server X does not exist in environment Y`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.result.get("message").and_then(serde_json::Value::as_str)
    }

    /// The remote error code, e.g. `messaging.config.beans.TargetServerDoesNotExist`.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.result.get("code").and_then(serde_json::Value::as_str)
    }

    fn describe(&self) -> String {
        match (self.message(), &self.result) {
            (Some(message), _) => message.to_string(),
            (None, serde_json::Value::Null) => "bad status".to_string(),
            (None, serde_json::Value::String(s)) if s.is_empty() => "bad status".to_string(),
            (None, serde_json::Value::String(s)) => s.clone(),
            (None, other) => other.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EdgeError {
    #[error("{operation}: {message}")]
    Validation {
        operation: &'static str,
        message: String,
    },

    #[error("Management API returned {0}")]
    Remote(#[from] RemoteError),

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No connection profile found.\n\n  {hint}")]
    NoConfigSource { hint: String },

    #[error("Profile not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Profile parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Profile validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported profile format: '{0}'")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl EdgeError {
    pub(crate) fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            operation,
            message: message.into(),
        }
    }

    /// Returns the remote error when the management API rejected the request.
    #[must_use]
    pub const fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
