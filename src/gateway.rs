// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Timeout-bounded single requests.
//!
//! The gateway is the leaf of the fetch path. It issues exactly one request per call,
//! bounds it with a per-call timeout, and converts every failure into `None` after
//! logging which identifiers failed and why. It never returns an error.
//!
//! The timeout is attached to the request future itself, so there is no shared timer
//! state: concurrent and nested timed calls are independent, and an abandoned call
//! leaves nothing behind that could affect the next one.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::TransportError;
use crate::transport::{RawResponse, RemoteService};
use crate::types::{AccessionId, Database, FetchRequest, SequenceWindow, Strand};

/// Runs `call` for at most `duration`, returning `default` if the bound is exceeded
///
/// A timed-out call is dropped (cancelled) and a single warning is logged.
///
/// # Example
///
/// ```rust
/// use seqcache::gateway::timed;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let value = timed(Duration::from_secs(1), -1, async { 7 }).await;
/// assert_eq!(value, 7);
/// # }
/// ```
pub async fn timed<F>(duration: Duration, default: F::Output, call: F) -> F::Output
where
    F: Future,
{
    match tokio::time::timeout(duration, call).await {
        Ok(value) => value,
        Err(_) => {
            warn!(
                timeout_ms = duration.as_millis() as u64,
                "Timeout reached after {:?}", duration
            );
            default
        }
    }
}

/// Issues single bounded requests against a [`RemoteService`]
#[derive(Debug, Clone)]
pub struct FetchGateway<S> {
    service: S,
    timeout: Duration,
}

impl<S: RemoteService> FetchGateway<S> {
    pub fn new(service: S, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues one request; `None` means the attempt failed and has been logged
    pub async fn fetch(&self, request: &FetchRequest) -> Option<RawResponse> {
        let timeout = self.timeout;
        let outcome = timed(
            timeout,
            Err(TransportError::Timeout { after: timeout }),
            self.service.execute(request),
        )
        .await;

        match outcome {
            Ok(raw) => {
                debug!(
                    service = self.service.name(),
                    target = %request.target(),
                    bytes = raw.len(),
                    "Request completed"
                );
                Some(raw)
            }
            Err(error) => {
                log_failure(request, &error);
                None
            }
        }
    }

    /// Fetches a nucleotide sequence, optionally windowed and stranded
    pub async fn fetch_nucleotide(
        &self,
        id: &AccessionId,
        window: Option<SequenceWindow>,
        strand: Option<Strand>,
    ) -> Option<RawResponse> {
        self.fetch(&FetchRequest::nucleotide(id, window, strand))
            .await
    }

    /// Fetches one gene record
    pub async fn fetch_gene(&self, id: &AccessionId) -> Option<RawResponse> {
        self.fetch(&FetchRequest::gene(id)).await
    }

    /// Fetches one or more protein records in a single request
    pub async fn fetch_protein(&self, ids: &[AccessionId]) -> Option<RawResponse> {
        self.fetch(&FetchRequest::protein(ids.to_vec())).await
    }

    /// Submits an identifier list for later retrieval
    pub async fn post_ids(&self, database: Database, ids: &[AccessionId]) -> Option<RawResponse> {
        self.fetch(&FetchRequest::PostIds {
            database,
            ids: ids.to_vec(),
        })
        .await
    }

    /// Searches a database by term
    pub async fn search(&self, database: Database, term: &str) -> Option<RawResponse> {
        self.fetch(&FetchRequest::Search {
            database,
            term: term.to_string(),
        })
        .await
    }
}

fn log_failure(request: &FetchRequest, error: &TransportError) {
    let database = request.database();
    let target = request.target();
    match error {
        TransportError::Http { status, reason } => warn!(
            %database,
            %target,
            status,
            reason = %reason,
            "Networking error: problem getting {} data for {}", database, target
        ),
        TransportError::Connection { reason: None } => warn!(
            %database,
            %target,
            "Networking error: corrupted connection error raised while getting {} data for {}",
            database,
            target
        ),
        other => warn!(
            %database,
            %target,
            error = %other,
            "Networking error: problem getting {} data for {}", database, target
        ),
    }
}
