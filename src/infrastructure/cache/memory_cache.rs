//! In-process cache with per-entry expiry.

use std::collections::HashMap;
use std::time::Duration;

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// A `HashMap`-backed [`CacheService`] used by tests and local runs.
///
/// Expiry uses [`tokio::time::Instant`], so tests running on a paused clock
/// can step past the TTL with `tokio::time::advance`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops the entry if it is still expired at `now`. Re-checked under the
    /// write lock, since a `set_url` may have refreshed it after the read.
    async fn remove_if_expired(&self, short_code: &str, now: Instant) {
        let mut entries = self.entries.write().await;
        if entries
            .get(short_code)
            .is_some_and(|(_, expires_at)| *expires_at <= now)
        {
            entries.remove(short_code);
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(short_code) {
                Some((url, expires_at)) if *expires_at > now => return Ok(Some(url.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        self.remove_if_expired(short_code, now).await;
        Ok(None)
    }

    async fn set_url(
        &self,
        short_code: &str,
        long_url: &str,
        ttl_seconds: u64,
    ) -> CacheResult<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.entries
            .write()
            .await
            .insert(short_code.to_string(), (long_url.to_string(), expires_at));
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache
            .set_url("abc123def", "https://example.com", DAY)
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc123def").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = MemoryCache::new();
        assert!(cache.get_url("nope").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set_url("abc123def", "https://example.com", DAY)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(DAY - 1)).await;
        assert!(cache.get_url("abc123def").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get_url("abc123def").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_refreshes_ttl() {
        let cache = MemoryCache::new();
        cache.set_url("abc123def", "https://a.example", 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set_url("abc123def", "https://a.example", 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        assert!(cache.get_url("abc123def").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshed_entry_survives_stale_expiry_check() {
        let cache = MemoryCache::new();
        cache.set_url("abc123def", "https://old.example.com", 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        let observed_expired_at = Instant::now();

        // Refreshed between the expired read and the removal.
        cache.set_url("abc123def", "https://new.example.com", 10).await.unwrap();
        cache.remove_if_expired("abc123def", observed_expired_at).await;

        assert_eq!(
            cache.get_url("abc123def").await.unwrap().as_deref(),
            Some("https://new.example.com")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_removed() {
        let cache = MemoryCache::new();
        cache.set_url("abc123def", "https://example.com", 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.get_url("abc123def").await.unwrap(), None);
        assert!(cache.entries.read().await.is_empty());
    }
}
