// File: ./src/error.rs
// Error kinds surfaced by the fetcher and the date recognizer.
use http::StatusCode;
use std::fmt;

/// Failure to retrieve a page. A single failed fetch only aborts the
/// operation that requested it; the caller decides whether that is fatal.
#[derive(Debug)]
pub enum FetchError {
    InvalidUrl { url: String, reason: String },
    Transport { url: String, reason: String },
    Timeout { url: String, secs: u64 },
    Status { url: String, status: StatusCode },
    Body { url: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl { url, reason } => write!(f, "Invalid URL '{}': {}", url, reason),
            FetchError::Transport { url, reason } => {
                write!(f, "Request to {} failed: {}", url, reason)
            }
            FetchError::Timeout { url, secs } => {
                write!(f, "Request to {} timed out after {}s", url, secs)
            }
            FetchError::Status { url, status } => write!(f, "HTTP {} from {}", status, url),
            FetchError::Body { url, reason } => {
                write!(f, "Failed to read response body from {}: {}", url, reason)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// A line matched the date grammar but could not be turned into a zoned instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    pub line: String,
    pub reason: String,
}

impl DateParseError {
    pub fn new(line: &str, reason: impl Into<String>) -> Self {
        Self {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot parse date line '{}': {}", self.line, self.reason)
    }
}

impl std::error::Error for DateParseError {}
