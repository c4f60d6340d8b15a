//! No-operation cache that disables caching entirely

use async_trait::async_trait;
use std::sync::Arc;

use super::{CacheKey, CacheStats, RecordCache};

/// A no-operation cache that disables caching entirely
///
/// Always misses and ignores writes, so every lookup goes to the remote service.
/// Selected when caching is disabled in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl<V> RecordCache<V> for NoOpCache
where
    V: Send + Sync + 'static,
{
    async fn get(&self, _key: &CacheKey) -> Option<Arc<V>> {
        None
    }

    async fn insert(&self, _key: CacheKey, _value: Arc<V>) {}

    async fn clear(&self) {}

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "NoOpCache"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
