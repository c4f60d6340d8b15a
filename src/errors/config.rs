//! Error types for building a client from configuration.

/// Errors that can occur while validating configuration or building the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The remote service requires a contact email on every request.
    #[error("A contact email is required by the remote service usage policy")]
    MissingEmail,

    /// The configured email does not look like an address.
    #[error("Invalid contact email: {email}")]
    InvalidEmail {
        /// The rejected value
        email: String,
    },

    /// A zero network timeout would cancel every request on its first poll.
    #[error("Network timeout must be greater than zero")]
    ZeroTimeout,

    /// The configured base URL could not be parsed.
    #[error("Invalid base URL {url}")]
    InvalidBaseUrl {
        /// The rejected value
        url: String,
        /// The parse failure
        #[source]
        source: url::ParseError,
    },

    /// An environment variable was set but could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidEnvValue {
        /// Variable name
        name: &'static str,
        /// The rejected value
        value: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigError {
    /// Helper to create an `InvalidEnvValue` error.
    pub fn invalid_env_value(name: &'static str, value: impl Into<String>) -> Self {
        ConfigError::InvalidEnvValue {
            name,
            value: value.into(),
        }
    }
}
