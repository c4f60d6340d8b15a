// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for seqcache clients
//!
//! Controls the per-request timeout, the retry budget, whether records are cached,
//! and the identity the remote service requires on every request.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use seqcache::SeqcacheConfig;
//!
//! let config = SeqcacheConfig::default().with_email("curator@example.org");
//! assert!(config.validate().is_ok());
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use seqcache::SeqcacheConfigBuilder;
//! use std::time::Duration;
//!
//! let config = SeqcacheConfigBuilder::new()
//!     .email("curator@example.org")
//!     .network_timeout(Duration::from_secs(10))
//!     .max_retries(2)
//!     .cache_enabled(false)
//!     .build();
//! assert_eq!(config.retry_policy().max_attempts(), 3);
//! ```

use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;
use crate::retry::RetryPolicy;
use crate::types::ReturnFormat;

pub mod constants;

use constants::{
    env, DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_DELAY, DEFAULT_NETWORK_TIMEOUT, DEFAULT_TOOL,
    EUTILS_BASE_URL,
};

/// Identity reported to the remote service with every request
///
/// NCBI asks every client to identify itself with a contact email and a tool name,
/// and accepts an API key for a higher request allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Contact email (required)
    pub email: String,
    /// Name of the calling tool
    pub tool: String,
    /// Optional API key
    pub api_key: Option<String>,
}

impl Identity {
    /// Query parameters carrying this identity
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("email", self.email.clone()), ("tool", self.tool.clone())];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            email: String::new(),
            tool: DEFAULT_TOOL.to_string(),
            api_key: None,
        }
    }
}

/// Configuration for seqcache operations
///
/// Use [`SeqcacheConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct SeqcacheConfig {
    /// Bound on a single request
    /// Default: 30 seconds
    pub network_timeout: Duration,

    /// Retries after the first attempt (a logical fetch makes at most `max_retries + 1` calls)
    /// Default: 0
    pub max_retries: u32,

    /// Base delay for exponential backoff between attempts
    /// Default: zero (retry immediately)
    pub retry_base_delay: Duration,

    /// Cap on the delay between attempts
    /// Default: 30 seconds
    pub retry_max_delay: Duration,

    /// Whether fetched records are memoized for the process lifetime
    /// Default: true
    pub cache_enabled: bool,

    /// Identity sent with every request
    pub identity: Identity,

    /// Service base URL
    pub base_url: String,

    /// Response format requested for gene and protein records
    pub return_format: ReturnFormat,
}

impl Default for SeqcacheConfig {
    fn default() -> Self {
        Self {
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::ZERO,
            retry_max_delay: DEFAULT_MAX_RETRY_DELAY,
            cache_enabled: true,
            identity: Identity::default(),
            base_url: EUTILS_BASE_URL.to_string(),
            return_format: ReturnFormat::default(),
        }
    }
}

impl SeqcacheConfig {
    /// Short timeout, no retries, no backoff
    ///
    /// Suitable for tests against mock services.
    pub fn minimal() -> Self {
        Self {
            network_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    /// Three retries with 500ms base backoff
    ///
    /// Suitable for long batch jobs against the public endpoint, which throttles
    /// clients without an API key.
    ///
    /// # Example
    ///
    /// ```rust
    /// use seqcache::SeqcacheConfig;
    /// use std::time::Duration;
    ///
    /// let config = SeqcacheConfig::resilient();
    /// assert_eq!(config.max_retries, 3);
    /// assert_eq!(config.retry_base_delay, Duration::from_millis(500));
    /// ```
    pub fn resilient() -> Self {
        Self {
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            ..Self::default()
        }
    }

    /// Sets the contact email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.identity.email = email.into();
        self
    }

    /// Retry policy derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
            .with_base_delay(self.retry_base_delay)
            .with_max_delay(self.retry_max_delay)
    }

    /// Parsed base URL
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    /// Checks the identity, timeout and base URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let email = self.identity.email.trim();
        if email.is_empty() {
            return Err(ConfigError::MissingEmail);
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(ConfigError::InvalidEmail {
                email: email.to_string(),
            });
        }
        self.base_url()?;
        Ok(())
    }

    /// Builds a configuration from `SEQCACHE_*` environment variables
    ///
    /// Unset variables keep their defaults. The result is validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = SeqcacheConfigBuilder::new();

        if let Some(email) = lookup(env::EMAIL) {
            builder = builder.email(email);
        }
        if let Some(tool) = lookup(env::TOOL) {
            builder = builder.tool(tool);
        }
        if let Some(key) = lookup(env::API_KEY).filter(|k| !k.is_empty()) {
            builder = builder.api_key(key);
        }
        if let Some(url) = lookup(env::BASE_URL) {
            builder = builder.base_url(url);
        }
        if let Some(raw) = lookup(env::TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid_env_value(env::TIMEOUT_SECS, raw.clone()))?;
            builder = builder.network_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(env::MAX_RETRIES) {
            let retries = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::invalid_env_value(env::MAX_RETRIES, raw.clone()))?;
            builder = builder.max_retries(retries);
        }
        if let Some(raw) = lookup(env::CACHE_ENABLED) {
            let enabled = parse_flag(&raw)
                .ok_or_else(|| ConfigError::invalid_env_value(env::CACHE_ENABLED, raw.clone()))?;
            builder = builder.cache_enabled(enabled);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for [`SeqcacheConfig`]
///
/// # Example
///
/// ```rust
/// use seqcache::{ReturnFormat, SeqcacheConfigBuilder};
/// use std::time::Duration;
///
/// let config = SeqcacheConfigBuilder::new()
///     .email("curator@example.org")
///     .api_key("0123456789abcdef")
///     .return_format(ReturnFormat::Json)
///     .retry_backoff(Duration::from_millis(250), Duration::from_secs(5))
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeqcacheConfigBuilder {
    config: SeqcacheConfig,
}

impl SeqcacheConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: SeqcacheConfig) -> Self {
        Self { config }
    }

    /// Set the bound on a single request
    pub fn network_timeout(mut self, timeout: Duration) -> Self {
        self.config.network_timeout = timeout;
        self
    }

    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set exponential backoff between attempts
    pub fn retry_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.config.retry_base_delay = base_delay;
        self.config.retry_max_delay = max_delay;
        self
    }

    /// Enable or disable record caching
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Set the contact email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.config.identity.email = email.into();
        self
    }

    /// Set the tool name
    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.config.identity.tool = tool.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.identity.api_key = Some(key.into());
        self
    }

    /// Set the service base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the response format for gene and protein records
    pub fn return_format(mut self, format: ReturnFormat) -> Self {
        self.config.return_format = format;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SeqcacheConfig {
        self.config
    }
}
