// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Bounded retry coordination for remote fetches.
//!
//! A [`RetryCoordinator`] owns a fresh [`RetryBudget`] for one logical fetch (one ID or
//! one batch). Each call to [`RetryCoordinator::attempt`] either spends one attempt or,
//! once the budget is gone, reports [`AttemptOutcome::Exhausted`] without calling out.
//!
//! Decode failures are treated exactly like transport failures: the attempt is spent and
//! the outcome is [`AttemptOutcome::Transient`].
//!
//! The backoff between attempts follows:
//!
//! ```text
//! delay = min(base_delay * 2^(retry - 1), max_delay)
//! ```
//!
//! A zero base delay (the default) retries immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::constants::DEFAULT_MAX_RETRY_DELAY;
use crate::decode::PayloadDecoder;
use crate::transport::RawResponse;

/// Result of one attempt against the remote service
///
/// Replaces integer sentinels so a legitimate payload can never be mistaken for a
/// failure marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome<T> {
    /// The attempt succeeded and decoded
    Payload(T),
    /// The attempt failed; the caller may try again
    Transient,
    /// The retry budget is spent; no call was made
    Exhausted,
}

impl<T> AttemptOutcome<T> {
    pub fn is_transient(&self) -> bool {
        matches!(self, AttemptOutcome::Transient)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, AttemptOutcome::Exhausted)
    }

    /// Returns the payload, discarding the failure kind
    pub fn payload(self) -> Option<T> {
        match self {
            AttemptOutcome::Payload(payload) => Some(payload),
            AttemptOutcome::Transient | AttemptOutcome::Exhausted => None,
        }
    }
}

/// Attempt counter for one logical fetch
///
/// Permits `max_retries + 1` attempts in total.
///
/// # Examples
///
/// ```rust
/// use seqcache::RetryBudget;
///
/// let mut budget = RetryBudget::new(1);
/// assert_eq!(budget.next_attempt(), Some(1));
/// assert_eq!(budget.next_attempt(), Some(2));
/// assert_eq!(budget.next_attempt(), None);
/// assert!(budget.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    attempts_made: u32,
    max_retries: u32,
}

impl RetryBudget {
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempts_made: 0,
            max_retries,
        }
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts_made >= self.max_attempts()
    }

    /// Claims the next attempt, returning its 1-based number, or `None` when spent
    pub fn next_attempt(&mut self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        self.attempts_made += 1;
        Some(self.attempts_made)
    }
}

/// Retry settings shared by every logical fetch of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RetryPolicy {
    /// Creates a policy with the given retry count and no backoff
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: DEFAULT_MAX_RETRY_DELAY,
        }
    }

    /// Sets the base delay for exponential backoff
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the maximum delay between attempts
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// A fresh budget for one logical fetch
    pub fn budget(&self) -> RetryBudget {
        RetryBudget::new(self.max_retries)
    }

    /// Delay before the given retry (1 = first retry)
    pub fn backoff(&self, retry: u32) -> Duration {
        if self.base_delay.is_zero() || retry == 0 {
            return Duration::ZERO;
        }
        let multiplier = 2u64.saturating_pow(retry - 1);
        let delay_ms = self
            .base_delay
            .as_millis()
            .saturating_mul(multiplier as u128);
        let capped_delay_ms = delay_ms.min(self.max_delay.as_millis()) as u64;
        Duration::from_millis(capped_delay_ms)
    }
}

/// Drives attempts for one logical fetch against a fixed budget
///
/// The fetch function is any closure producing a future that resolves to the raw
/// response, or `None` when the attempt failed (the gateway has already logged why).
///
/// # Example
///
/// ```rust,ignore
/// let mut coordinator = RetryCoordinator::new(config.retry_policy());
/// let outcome = coordinator
///     .run_to_completion(|| gateway.fetch(&request), &JsonDecoder)
///     .await;
/// ```
#[derive(Debug)]
pub struct RetryCoordinator {
    policy: RetryPolicy,
    budget: RetryBudget,
}

impl RetryCoordinator {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            budget: policy.budget(),
            policy,
        }
    }

    pub fn budget(&self) -> RetryBudget {
        self.budget
    }

    /// Makes at most one attempt
    pub async fn attempt<F, Fut, D>(&mut self, fetch: F, decoder: &D) -> AttemptOutcome<D::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<RawResponse>>,
        D: PayloadDecoder + ?Sized,
    {
        let Some(attempt) = self.budget.next_attempt() else {
            return AttemptOutcome::Exhausted;
        };

        if attempt > 1 {
            let max_attempts = self.budget.max_attempts();
            warn!(
                attempt,
                max_attempts,
                "Retry number {} of {}",
                attempt,
                max_attempts
            );
            let delay = self.policy.backoff(attempt - 1);
            if !delay.is_zero() {
                debug!(delay_ms = delay.as_millis() as u64, "Backing off before retry");
                tokio::time::sleep(delay).await;
            }
        }

        let Some(raw) = fetch().await else {
            return AttemptOutcome::Transient;
        };

        match decoder.decode(&raw) {
            Ok(payload) => AttemptOutcome::Payload(payload),
            Err(error) => {
                warn!(attempt, error = %error, "Discarding undecodable response");
                AttemptOutcome::Transient
            }
        }
    }

    /// Repeats [`attempt`](Self::attempt) until it yields a payload or the budget is spent
    ///
    /// Never returns [`AttemptOutcome::Transient`].
    pub async fn run_to_completion<F, Fut, D>(
        &mut self,
        mut fetch: F,
        decoder: &D,
    ) -> AttemptOutcome<D::Output>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<RawResponse>>,
        D: PayloadDecoder + ?Sized,
    {
        loop {
            match self.attempt(&mut fetch, decoder).await {
                AttemptOutcome::Transient => continue,
                outcome => return outcome,
            }
        }
    }
}
