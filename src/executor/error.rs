//! Execution failure types.
//!
//! Failures are terminal values delivered through the failure branch of the
//! execution handle, never thrown across the asynchronous boundary. HTTP
//! error statuses (4xx/5xx) are not failures at this layer; they are
//! successful deliveries carrying a non-2xx status.

use std::fmt;

/// The category of an execution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// Connection refused, DNS failure, reset, or a malformed response.
    Network,

    /// Certificate or hostname validation failure. Only possible when
    /// certificate validation is enabled.
    Tls,

    /// The transport exceeded the configured timeout.
    Timeout,

    /// The caller withdrew interest before completion.
    Cancelled,
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureCategory::Network => "network error",
            FailureCategory::Tls => "TLS error",
            FailureCategory::Timeout => "timeout",
            FailureCategory::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// A failed execution outcome.
#[derive(Debug, Clone)]
pub struct RequestFailure {
    /// What went wrong.
    pub category: FailureCategory,

    /// The HTTP status, if a response was received before the failure.
    pub status: Option<u16>,

    /// Description of the underlying cause.
    pub cause: String,
}

impl RequestFailure {
    pub fn network(cause: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::Network,
            status: None,
            cause: cause.into(),
        }
    }

    pub fn tls(cause: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::Tls,
            status: None,
            cause: cause.into(),
        }
    }

    pub fn timeout(cause: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::Timeout,
            status: None,
            cause: cause.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            category: FailureCategory::Cancelled,
            status: None,
            cause: "request cancelled".to_string(),
        }
    }

    /// Records the partial HTTP status received before the failure.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {}): {}", self.category, status, self.cause),
            None => write!(f, "{}: {}", self.category, self.cause),
        }
    }
}

impl std::error::Error for RequestFailure {}

/// Maps reqwest's error types to the failure taxonomy.
impl From<reqwest::Error> for RequestFailure {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let text = err.to_string();

        let failure = if err.is_timeout() {
            RequestFailure::timeout(text)
        } else if text.contains("certificate") || text.contains("TLS") || text.contains("SSL") {
            RequestFailure::tls(text)
        } else {
            RequestFailure::network(text)
        };

        match status {
            Some(status) => failure.with_status(status),
            None => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = RequestFailure::network("connection refused");
        assert_eq!(failure.to_string(), "network error: connection refused");

        let failure = RequestFailure::timeout("deadline exceeded");
        assert_eq!(failure.to_string(), "timeout: deadline exceeded");

        let failure = RequestFailure::tls("certificate invalid");
        assert_eq!(failure.to_string(), "TLS error: certificate invalid");

        let failure = RequestFailure::cancelled();
        assert_eq!(failure.category, FailureCategory::Cancelled);
        assert_eq!(failure.to_string(), "cancelled: request cancelled");
    }

    #[test]
    fn test_failure_with_partial_status() {
        let failure = RequestFailure::network("body read failed").with_status(502);
        assert_eq!(failure.status, Some(502));
        assert_eq!(
            failure.to_string(),
            "network error (status 502): body read failed"
        );
    }

    #[test]
    fn test_failure_is_error_trait() {
        let failure: &dyn std::error::Error = &RequestFailure::cancelled();
        assert_eq!(format!("{}", failure), "cancelled: request cancelled");
    }
}
