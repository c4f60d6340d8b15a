// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for seqcache operations.
//!
//! Telemetry concerns are kept out of business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here and attaches it
//! with [`tracing::Instrument`].
//!
//! Usage pattern:
//! ```rust,ignore
//! async move {
//!     // Business logic here
//! }
//! .instrument(spans::fetch_record("gene", &id))
//! .await
//! ```

use tracing::{Level, Span};

use crate::types::AccessionId;

/// Create span for a single cached record lookup.
///
/// Parent: None (root span for this operation)
/// Children: retry attempts and gateway requests
#[inline]
pub(crate) fn fetch_record(kind: &'static str, id: &AccessionId) -> Span {
    tracing::span!(
        Level::INFO,
        "seqcache.fetch_record",
        kind = kind,
        id = %id,
    )
}

/// Create span for fetching a batch of identifiers.
///
/// Parent: `seqcache.fetch_record`, `seqcache.bisect` or None
/// Children: `seqcache.bisect` spans when the batch has to be split
#[inline]
pub(crate) fn fetch_batch(batch_size: usize) -> Span {
    tracing::debug_span!("seqcache.fetch_batch", batch_size = batch_size)
}

/// Create span for one bisection step of a failing batch.
#[inline]
pub(crate) fn bisect(left: usize, right: usize) -> Span {
    tracing::debug_span!("seqcache.bisect", left = left, right = right)
}
