// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Batch fetching with recursive bisection.
//!
//! A batch request either resolves every identifier or, when retries are spent or
//! the service answers with the wrong number of records, is split at the midpoint
//! and each half is fetched again. Splitting stops at single identifiers, which
//! resolve to [`BatchEntry::Unresolved`] when they still fail. The output is always
//! index-aligned with the input.
//!
//! Recursion depth is bounded by `log2(n)` and every step uses a fresh retry budget.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn, Instrument};

use crate::decode::PayloadDecoder;
use crate::retry::{AttemptOutcome, RetryCoordinator, RetryPolicy};
use crate::spans;
use crate::transport::RawResponse;
use crate::types::AccessionId;

/// Result for one identifier of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry<T> {
    /// The record returned for this identifier
    Found(T),
    /// The identifier could not be resolved, even on its own
    Unresolved,
}

impl<T> BatchEntry<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Unresolved => None,
        }
    }

    pub fn as_found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Unresolved => None,
        }
    }
}

/// Fetches `ids` in one request, bisecting on failure
///
/// `fetch` issues a single request for the identifiers it is given and is passed
/// unchanged to every recursive step. `decoder` must produce one element per
/// requested identifier, in request order.
///
/// An empty `ids` returns an empty vector without calling `fetch`.
///
/// # Example
///
/// ```rust,ignore
/// let entries = fetch_batch(
///     &ids,
///     &|ids| async move { gateway.fetch_protein(&ids).await },
///     &JsonListDecoder,
///     config.retry_policy(),
/// )
/// .await;
/// assert_eq!(entries.len(), ids.len());
/// ```
pub fn fetch_batch<'a, F, Fut, D, T>(
    ids: &'a [AccessionId],
    fetch: &'a F,
    decoder: &'a D,
    policy: RetryPolicy,
) -> BoxFuture<'a, Vec<BatchEntry<T>>>
where
    F: Fn(Vec<AccessionId>) -> Fut + Sync,
    Fut: Future<Output = Option<RawResponse>> + Send + 'a,
    D: PayloadDecoder<Output = Vec<T>> + Sync,
    T: Send + 'a,
{
    async move {
        if ids.is_empty() {
            return Vec::new();
        }

        let mut coordinator = RetryCoordinator::new(policy);
        let outcome = coordinator
            .run_to_completion(|| fetch(ids.to_vec()), decoder)
            .await;

        match outcome {
            AttemptOutcome::Payload(records) if records.len() == ids.len() => {
                records.into_iter().map(BatchEntry::Found).collect()
            }
            outcome => {
                if let AttemptOutcome::Payload(records) = &outcome {
                    debug!(
                        requested = ids.len(),
                        returned = records.len(),
                        "Batch result is misaligned with request"
                    );
                }

                if let [id] = ids {
                    warn!(id = %id, "Could not resolve identifier");
                    return vec![BatchEntry::Unresolved];
                }

                let (left, right) = ids.split_at(ids.len() / 2);
                async move {
                    let mut entries = fetch_batch(left, fetch, decoder, policy).await;
                    entries.extend(fetch_batch(right, fetch, decoder, policy).await);
                    entries
                }
                .instrument(spans::bisect(left.len(), right.len()))
                .await
            }
        }
    }
    .instrument(spans::fetch_batch(ids.len()))
    .boxed()
}
