// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the NCBI E-utilities.

use async_trait::async_trait;
use std::time::Duration;
use tracing::trace;
use url::Url;

use super::{RawResponse, RemoteService};
use crate::config::{Identity, SeqcacheConfig};
use crate::errors::{ConfigError, TransportError};
use crate::types::{Endpoint, FetchRequest, ReturnFormat};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`RemoteService`] backed by the E-utilities HTTP API
///
/// Adds the configured identity to every request. Identifier-list submissions are
/// sent as form posts; everything else is a GET with query parameters.
///
/// No request-level timeout is set here: the gateway bounds each call.
#[derive(Debug, Clone)]
pub struct EutilsClient {
    http: reqwest::Client,
    base_url: Url,
    identity: Identity,
    format: ReturnFormat,
}

impl EutilsClient {
    /// Creates a client from a validated configuration
    pub fn new(config: &SeqcacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("seqcache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url()?,
            identity: config.identity.clone(),
            format: config.return_format,
        })
    }

    /// Full URL for an endpoint
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, TransportError> {
        self.base_url
            .join(endpoint.path())
            .map_err(|e| TransportError::invalid_request(e.to_string()))
    }

    fn params(&self, request: &FetchRequest) -> Vec<(&'static str, String)> {
        let mut params = request.query_params(self.format);
        params.extend(self.identity.query_params());
        params
    }
}

#[async_trait]
impl RemoteService for EutilsClient {
    async fn execute(&self, request: &FetchRequest) -> Result<RawResponse, TransportError> {
        if matches!(
            request,
            FetchRequest::Protein { .. } | FetchRequest::PostIds { .. }
        ) && request.ids().is_empty()
        {
            return Err(TransportError::invalid_request("empty identifier list"));
        }

        let endpoint = request.endpoint();
        let url = self.endpoint_url(endpoint)?;
        let params = self.params(request);
        trace!(url = %url, target = %request.target(), "Sending request");

        let builder = match endpoint {
            Endpoint::Post => self.http.post(url).form(&params),
            Endpoint::Fetch | Endpoint::Search => self.http.get(url).query(&params),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return Err(TransportError::http(status.as_u16(), reason));
        }

        let body = response.text().await?;
        Ok(RawResponse::new(body))
    }

    fn name(&self) -> &'static str {
        "eutils"
    }
}
