// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory record cache

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::{CacheKey, CacheStats, RecordCache};

/// Internal state for memory cache
struct MemoryCacheState<V> {
    entries: HashMap<CacheKey, Arc<V>>,
    stats: CacheStats,
}

impl<V> Default for MemoryCacheState<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

/// In-memory cache that keeps every record for the process lifetime
///
/// Entries are never evicted or expired. Access is serialized through an async
/// mutex, so the cache can be shared between concurrent lookups.
///
/// # Performance
///
/// - Get: O(1) average case (HashMap lookup)
/// - Insert: O(1) average case
pub struct MemoryCache<V> {
    state: Mutex<MemoryCacheState<V>>,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryCacheState::default()),
        }
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for MemoryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl<V> RecordCache<V> for MemoryCache<V>
where
    V: Send + Sync + 'static,
{
    async fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        let mut state = self.state.lock().await;
        match state.entries.get(key).cloned() {
            Some(value) => {
                state.stats.hits += 1;
                debug!(key = %key, "Cache hit");
                Some(value)
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    async fn insert(&self, key: CacheKey, value: Arc<V>) {
        let mut state = self.state.lock().await;
        state.entries.insert(key, value);
        state.stats.inserts += 1;
    }

    async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
    }

    async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        CacheStats {
            entries: state.entries.len(),
            ..state.stats
        }
    }

    fn name(&self) -> &'static str {
        "MemoryCache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccessionId;

    fn key(id: &str) -> CacheKey {
        CacheKey::from_id(&AccessionId::new(id))
    }

    #[tokio::test]
    async fn test_get_returns_same_allocation() {
        let cache = MemoryCache::new();
        let value = Arc::new("TP53".to_string());
        cache.insert(key("7157"), value.clone()).await;

        let first = cache.get(&key("7157")).await.unwrap();
        let second = cache.get(&key("7157")).await.unwrap();
        assert!(Arc::ptr_eq(&first, &value));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_stats_track_hits_and_misses() {
        let cache = MemoryCache::new();
        assert!(cache.get(&key("A")).await.is_none());
        cache.insert(key("A"), Arc::new(1u32)).await;
        cache.get(&key("A")).await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.entries, 1);
        assert!(cache.is_enabled());
    }

    #[tokio::test]
    async fn test_insert_replaces() {
        let cache = MemoryCache::new();
        cache.insert(key("A"), Arc::new(1u32)).await;
        cache.insert(key("A"), Arc::new(2u32)).await;
        assert_eq!(*cache.get(&key("A")).await.unwrap(), 2);
        assert_eq!(cache.stats().await.entries, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();
        cache.insert(key("A"), Arc::new(1u32)).await;
        cache.clear().await;
        assert!(cache.get(&key("A")).await.is_none());
        assert_eq!(cache.stats().await.entries, 0);
    }
}
