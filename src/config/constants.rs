//! Service endpoints and default limits
//!
//! Centralizes the constants used by the configuration defaults.

use std::time::Duration;

/// Public NCBI E-utilities endpoint (trailing slash required for URL joining)
pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

/// Tool name reported to the service when none is configured
pub const DEFAULT_TOOL: &str = "seqcache";

/// Default bound on a single request
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 0;

/// Default cap on the delay between two attempts
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Environment variables read by [`SeqcacheConfig::from_env`](super::SeqcacheConfig::from_env)
pub mod env {
    pub const EMAIL: &str = "SEQCACHE_EMAIL";
    pub const TOOL: &str = "SEQCACHE_TOOL";
    pub const API_KEY: &str = "SEQCACHE_API_KEY";
    pub const BASE_URL: &str = "SEQCACHE_BASE_URL";
    pub const TIMEOUT_SECS: &str = "SEQCACHE_TIMEOUT_SECS";
    pub const MAX_RETRIES: &str = "SEQCACHE_MAX_RETRIES";
    pub const CACHE_ENABLED: &str = "SEQCACHE_CACHE_ENABLED";
}
