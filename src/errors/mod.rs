// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the seqcache library.
//!
//! The fetch path never returns errors to callers: every failure ends as a
//! logged message and either a retry, a bisection step, or a record whose
//! status says what happened. The types here describe *why* an attempt failed
//! and are what [`RemoteService`](crate::transport::RemoteService) and
//! [`PayloadDecoder`](crate::decode::PayloadDecoder) implementations report.
//!
//! - [`TransportError`] - one request failed (HTTP status, connection, timeout)
//! - [`DecodeError`] - a response body could not be turned into structured data
//! - [`ConfigError`] - configuration or HTTP client construction failed
//!
//! [`SeqcacheError`] unifies them for callers that just want `?`.

mod config;
mod decode;
mod transport;

pub use config::ConfigError;
pub use decode::DecodeError;
pub use transport::TransportError;

/// Unified error type for all seqcache operations.
///
/// # Examples
///
/// ```rust,no_run
/// use seqcache::{SeqcacheConfig, SeqcacheError, SequenceClient};
///
/// # async fn example() -> Result<(), SeqcacheError> {
/// let config = SeqcacheConfig::from_env()?;
/// let client = SequenceClient::from_config(&config)?;
/// let gene = client.gene("7157").await;
/// println!("{:?}", gene.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SeqcacheError {
    /// Error from configuration or client construction.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a single request to the remote service.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error from payload decoding.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}
