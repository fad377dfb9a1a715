//! Bounded, time-boxed cache of recently captured pages.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;
use variantsmith_config::CacheConfig;
use variantsmith_protocols::{ElementDatabase, ExtractionMode};

/// A captured element database and the screenshot taken with it.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub database: Arc<ElementDatabase>,
    pub screenshot: Option<String>,
}

struct CacheEntry {
    url: String,
    mode: ExtractionMode,
    inserted_at: Instant,
    page: CachedPage,
}

/// Keyed by the requested URL plus extraction mode. Entries expire after
/// `ttl`; when full, the entry inserted longest ago is evicted.
pub struct ElementDatabaseCache {
    entries: Mutex<VecDeque<CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl ElementDatabaseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.ttl_seconds))
    }

    pub fn get(&self, url: &str, mode: ExtractionMode) -> Option<CachedPage> {
        self.get_at(url, mode, Instant::now())
    }

    /// Store a capture under the URL and mode it was requested with. The
    /// database's own metadata may report a canonical URL; it is not used
    /// as the key.
    pub fn insert(
        &self,
        url: &str,
        mode: ExtractionMode,
        database: ElementDatabase,
        screenshot: Option<String>,
    ) -> CachedPage {
        self.insert_at(url, mode, database, screenshot, Instant::now())
    }

    pub(crate) fn get_at(&self, url: &str, mode: ExtractionMode, now: Instant) -> Option<CachedPage> {
        let mut entries = self.entries.lock();
        entries.retain(|e| now.saturating_duration_since(e.inserted_at) < self.ttl);
        let hit = entries
            .iter()
            .find(|e| e.url == url && e.mode == mode)
            .map(|e| e.page.clone());
        debug!(url = %url, hit = hit.is_some(), "Element database cache lookup");
        hit
    }

    /// Replaces any entry with the same key.
    pub(crate) fn insert_at(
        &self,
        url: &str,
        mode: ExtractionMode,
        database: ElementDatabase,
        screenshot: Option<String>,
        now: Instant,
    ) -> CachedPage {
        let page = CachedPage {
            database: Arc::new(database),
            screenshot,
        };
        if self.capacity == 0 {
            return page;
        }
        let mut entries = self.entries.lock();
        entries.retain(|e| {
            !(e.url == url && e.mode == mode) && now.saturating_duration_since(e.inserted_at) < self.ttl
        });
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(CacheEntry {
            url: url.to_string(),
            mode,
            inserted_at: now,
            page: page.clone(),
        });
        page
    }

    /// Drop every cached page for `url`.
    pub fn invalidate(&self, url: &str) {
        self.entries.lock().retain(|e| e.url != url);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use variantsmith_protocols::ElementRecord;

    const FULL: ExtractionMode = ExtractionMode::Full;

    fn db(url: &str) -> ElementDatabase {
        ElementDatabase::from_elements(url, vec![ElementRecord::new("#cta", "button")])
    }

    fn put(cache: &ElementDatabaseCache, url: &str, now: Instant) {
        cache.insert_at(url, FULL, db(url), None, now);
    }

    #[test]
    fn test_hit_and_mode_keying() {
        let cache = ElementDatabaseCache::new(4, Duration::from_secs(60));
        cache.insert("https://a.test", FULL, db("https://a.test"), None);
        assert!(cache.get("https://a.test", FULL).is_some());
        assert!(cache.get("https://a.test", ExtractionMode::Focused).is_none());
        assert!(cache.get("https://b.test", FULL).is_none());
    }

    #[test]
    fn test_keyed_by_requested_url_not_metadata() {
        let cache = ElementDatabaseCache::new(4, Duration::from_secs(60));
        let mut database = db("https://a.test/?utm=x");
        database.metadata.mode = ExtractionMode::Focused;
        cache.insert("https://a.test", FULL, database, None);

        let hit = cache.get("https://a.test", FULL).unwrap();
        assert_eq!(hit.database.metadata.url, "https://a.test/?utm=x");
        assert!(cache.get("https://a.test/?utm=x", FULL).is_none());
    }

    #[test]
    fn test_screenshot_is_cached_with_database() {
        let cache = ElementDatabaseCache::new(4, Duration::from_secs(60));
        cache.insert(
            "https://a.test",
            FULL,
            db("https://a.test"),
            Some("data:image/png;base64,AAAA".to_string()),
        );
        let hit = cache.get("https://a.test", FULL).unwrap();
        assert_eq!(hit.screenshot.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = ElementDatabaseCache::new(4, Duration::from_secs(60));
        let start = Instant::now();
        put(&cache, "https://a.test", start);
        assert!(cache.get_at("https://a.test", FULL, start + Duration::from_secs(59)).is_some());
        assert!(cache.get_at("https://a.test", FULL, start + Duration::from_secs(60)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evicts_least_recently_inserted() {
        let cache = ElementDatabaseCache::new(2, Duration::from_secs(60));
        let start = Instant::now();
        put(&cache, "https://a.test", start);
        put(&cache, "https://b.test", start);
        // Reading does not refresh insertion order.
        assert!(cache.get_at("https://a.test", FULL, start).is_some());
        put(&cache, "https://c.test", start);

        assert!(cache.get_at("https://a.test", FULL, start).is_none());
        assert!(cache.get_at("https://b.test", FULL, start).is_some());
        assert!(cache.get_at("https://c.test", FULL, start).is_some());
    }

    #[test]
    fn test_reinsert_replaces_entry() {
        let cache = ElementDatabaseCache::new(2, Duration::from_secs(60));
        cache.insert("https://a.test", FULL, db("https://a.test"), None);
        cache.insert("https://a.test", FULL, db("https://a.test"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = ElementDatabaseCache::new(0, Duration::from_secs(60));
        let stored = cache.insert("https://a.test", FULL, db("https://a.test"), None);
        assert_eq!(stored.database.len(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let cache = ElementDatabaseCache::new(4, Duration::from_secs(60));
        cache.insert("https://a.test", FULL, db("https://a.test"), None);
        cache.insert("https://b.test", FULL, db("https://b.test"), None);
        cache.invalidate("https://a.test");
        assert_eq!(cache.len(), 1);
    }
}
