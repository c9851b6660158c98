// Time-to-live cache of fetched rankings CSV text, keyed by URL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Default lifetime of a cached fetch.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(900);

#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    stored_at: Instant,
    fetched_at: DateTime<Utc>,
}

/// A cached CSV body and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedText {
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RankingsCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl RankingsCache {
    pub fn new(ttl: Duration) -> Self {
        RankingsCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached body for `url` if it is younger than the TTL. Expired
    /// entries are evicted on lookup.
    pub fn get(&self, url: &str) -> Option<CachedText> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let fresh = entries
            .get(url)
            .map(|entry| entry.stored_at.elapsed() < self.ttl)?;
        if !fresh {
            entries.remove(url);
            return None;
        }
        entries.get(url).map(|entry| CachedText {
            text: entry.text.clone(),
            fetched_at: entry.fetched_at,
        })
    }

    pub fn insert(&self, url: &str, text: String) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            url.to_string(),
            CacheEntry {
                text,
                stored_at: Instant::now(),
                fetched_at: Utc::now(),
            },
        );
    }

    /// Drop every entry so the next load fetches fresh text.
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RankingsCache {
    fn default() -> Self {
        RankingsCache::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = RankingsCache::new(Duration::from_secs(60));
        cache.insert("https://example.test/a.csv", "player,pos\n".to_string());
        assert!(cache.get("https://example.test/a.csv").is_some());

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("https://example.test/a.csv").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("https://example.test/a.csv").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_drops_everything() {
        let cache = RankingsCache::default();
        cache.insert("a", "x".to_string());
        cache.insert("b", "y".to_string());
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn keyed_by_url() {
        let cache = RankingsCache::default();
        cache.insert("a", "first".to_string());
        assert_eq!(cache.get("a").map(|c| c.text), Some("first".to_string()));
        assert!(cache.get("b").is_none());
    }
}
