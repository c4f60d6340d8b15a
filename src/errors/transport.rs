//! Error types for single requests against the remote query service.
//!
//! These errors never escape the fetch path: the gateway logs them and turns them
//! into a transient attempt outcome. They are public so that custom
//! [`RemoteService`](crate::transport::RemoteService) implementations can report
//! failures in the same vocabulary.

use std::time::Duration;

/// Errors that can occur while issuing one request to the remote service.
///
/// # Examples
///
/// ```rust
/// use seqcache::TransportError;
///
/// let error = TransportError::http(503, "Service Unavailable");
/// assert_eq!(error.to_string(), "HTTP error (503): Service Unavailable");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP error ({status}): {reason}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Reason phrase reported with the status
        reason: String,
    },

    /// A lower-level connection failure (DNS, TLS, reset, truncated body).
    ///
    /// Some client libraries raise connection errors without a usable reason,
    /// in which case `reason` is `None`.
    #[error("{}", describe_connection(.reason))]
    Connection {
        /// Cause reported by the underlying client, if any
        reason: Option<String>,
    },

    /// The request did not complete within the configured bound.
    #[error("timeout reached after {} ms", .after.as_millis())]
    Timeout {
        /// The bound that was exceeded
        after: Duration,
    },

    /// The request could not be built (for example, an empty identifier list).
    #[error("invalid request: {details}")]
    InvalidRequest {
        /// Description of the problem
        details: String,
    },
}

fn describe_connection(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!("connection error: {reason}"),
        None => "corrupted connection error raised".to_string(),
    }
}

impl TransportError {
    /// Create an `Http` error from a status code and reason phrase.
    pub fn http(status: u16, reason: impl Into<String>) -> Self {
        TransportError::Http {
            status,
            reason: reason.into(),
        }
    }

    /// Create a `Connection` error, treating a blank reason as missing.
    pub fn connection(reason: Option<String>) -> Self {
        TransportError::Connection {
            reason: reason.filter(|r| !r.trim().is_empty()),
        }
    }

    /// Create an `InvalidRequest` error with details.
    pub fn invalid_request(details: impl Into<String>) -> Self {
        TransportError::InvalidRequest {
            details: details.into(),
        }
    }

    /// Returns `true` if this failure was produced by the timeout bound.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return TransportError::http(status.as_u16(), reason);
        }
        if error.is_builder() {
            return TransportError::invalid_request(error.to_string());
        }
        TransportError::connection(Some(error.to_string()))
    }
}
