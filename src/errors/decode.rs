//! Error types for payload decoding.
//!
//! A decode failure is handled exactly like a transport failure: the attempt is
//! counted and retried while the budget allows.

/// Errors that can occur while decoding a raw response into structured form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The body ended early, usually because the transfer was cut short.
    #[error("incomplete read: {details}")]
    IncompleteRead {
        /// What was missing
        details: String,
    },

    /// The body has the expected shape but its content is damaged.
    #[error("corrupted payload: {details}")]
    Corrupted {
        /// What was wrong with the content
        details: String,
    },

    /// The body is not structured data at all (HTML error page, markup, plain text).
    #[error("payload is not structured data: {details}")]
    NotStructured {
        /// What was received instead
        details: String,
    },

    /// The body parsed but failed validation (service-reported error, missing section).
    #[error("payload failed validation: {details}")]
    Validation {
        /// Validation failure description
        details: String,
    },
}

impl DecodeError {
    /// Create an `IncompleteRead` error with details.
    pub fn incomplete(details: impl Into<String>) -> Self {
        DecodeError::IncompleteRead {
            details: details.into(),
        }
    }

    /// Create a `Corrupted` error with details.
    pub fn corrupted(details: impl Into<String>) -> Self {
        DecodeError::Corrupted {
            details: details.into(),
        }
    }

    /// Create a `NotStructured` error with details.
    pub fn not_structured(details: impl Into<String>) -> Self {
        DecodeError::NotStructured {
            details: details.into(),
        }
    }

    /// Create a `Validation` error with details.
    pub fn validation(details: impl Into<String>) -> Self {
        DecodeError::Validation {
            details: details.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(error: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match error.classify() {
            Category::Eof | Category::Io => DecodeError::incomplete(error.to_string()),
            Category::Syntax => DecodeError::corrupted(error.to_string()),
            Category::Data => DecodeError::validation(error.to_string()),
        }
    }
}
