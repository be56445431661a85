use std::fmt;

/// Failures of a backend call or a client-side check.
///
/// Every transport outcome is normalized into one of these variants so
/// callers only ever need the display text.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Backend unreachable, timed out, or the body could not be read.
    Network(String),
    /// Backend answered with a non-2xx status.
    Http {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },
    /// Backend answered `success: false`; holds the server-provided reason.
    Application(String),
    /// Response body was not the expected JSON.
    Decode(String),
    /// Rejected locally before any network call.
    BadRequest(String),
    /// Internal error.
    InternalError(String),
}

impl AppError {
    pub fn http(status: reqwest::StatusCode) -> Self {
        AppError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Http { status, reason } if reason.is_empty() => {
                write!(f, "HTTP error! status: {}", status)
            }
            AppError::Http { status, reason } => {
                write!(f, "HTTP error! status: {} - {}", status, reason)
            }
            // Server-provided reasons are shown verbatim.
            AppError::Application(msg) => write!(f, "{}", msg),
            AppError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::http(status)
        } else {
            AppError::Network(err.to_string())
        }
    }
}
