// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Record cache backends
//!
//! Records are memoized for the lifetime of the process, keyed by the identifier
//! (plus window and strand for nucleotide sequences). Found, empty and not-found
//! records are all cached, so a lookup that has failed terminally once is not
//! retried.
//!
//! - [`MemoryCache`]: in-memory map, never evicts
//! - [`NoOpCache`]: disables caching entirely
//!
//! # Examples
//!
//! ```rust,ignore
//! use seqcache::cache::{MemoryCache, NoOpCache, RecordCache};
//! use std::sync::Arc;
//!
//! let cache: MemoryCache<GeneRecord> = MemoryCache::new();
//! cache.insert(CacheKey::from_id(&id), Arc::new(record)).await;
//! let hit = cache.get(&CacheKey::from_id(&id)).await;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::types::{AccessionId, SequenceWindow, Strand};

mod memory;
mod noop;

pub use memory::MemoryCache;
pub use noop::NoOpCache;

/// Key for cached records
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a record identified by its accession alone
    pub fn from_id(id: &AccessionId) -> Self {
        Self(id.as_str().to_string())
    }

    /// Key for a nucleotide sequence, which also depends on window and strand
    pub fn nucleotide(
        id: &AccessionId,
        window: Option<SequenceWindow>,
        strand: Option<Strand>,
    ) -> Self {
        let mut key = id.as_str().to_string();
        if let Some(window) = window {
            key.push_str(&format!(":{window}"));
        }
        if let Some(strand) = strand {
            key.push_str(&format!(":s{}", strand.code()));
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Statistics about cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of lookups answered from the cache
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Number of records stored
    pub inserts: u64,
    /// Current number of entries
    pub entries: usize,
}

impl CacheStats {
    /// Ratio of hits to lookups, 0.0 when there were no lookups
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Storage for constructed records
///
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait RecordCache<V>: Send + Sync
where
    V: Send + Sync + 'static,
{
    /// Returns the cached record, if any
    async fn get(&self, key: &CacheKey) -> Option<Arc<V>>;

    /// Stores a record, replacing any previous one under the same key
    async fn insert(&self, key: CacheKey, value: Arc<V>);

    /// Removes every entry
    async fn clear(&self);

    /// Usage statistics
    async fn stats(&self) -> CacheStats;

    /// Backend name for log lines
    fn name(&self) -> &'static str;

    /// `false` for backends that never store anything
    fn is_enabled(&self) -> bool {
        true
    }
}
