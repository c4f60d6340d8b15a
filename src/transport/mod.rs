// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport to the remote query service.
//!
//! [`RemoteService`] is the seam between the caching/retry core and the network.
//! [`EutilsClient`] implements it over HTTP; tests and alternative backends provide
//! their own implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use seqcache::transport::{EutilsClient, RemoteService};
//! use seqcache::{FetchRequest, SeqcacheConfig};
//!
//! let config = SeqcacheConfig::default().with_email("curator@example.org");
//! let client = EutilsClient::new(&config)?;
//! let raw = client.execute(&FetchRequest::gene("7157")).await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::TransportError;
use crate::types::FetchRequest;

mod eutils;

pub use eutils::EutilsClient;

/// Body of one successful response
///
/// Owned only until the retry coordinator has decoded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    body: String,
}

impl RawResponse {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Issues requests to the remote query service
///
/// Implementations report failures as [`TransportError`]; they do not retry, time out,
/// or log. Those concerns belong to the [`FetchGateway`](crate::gateway::FetchGateway)
/// and the [`RetryCoordinator`](crate::retry::RetryCoordinator).
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Execute one request
    async fn execute(&self, request: &FetchRequest) -> Result<RawResponse, TransportError>;

    /// Name used in log lines
    fn name(&self) -> &'static str {
        "remote"
    }
}

#[async_trait]
impl<S> RemoteService for Arc<S>
where
    S: RemoteService + ?Sized,
{
    async fn execute(&self, request: &FetchRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
