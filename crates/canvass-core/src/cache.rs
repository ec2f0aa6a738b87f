// ── Client-side cache ──
//
// Key/TTL in-memory store with substring invalidation. Explicitly
// injectable: screens receive a `CacheService` clone from the console
// rather than reaching for shared module state, so tests can run against
// an isolated instance.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::trace;

use crate::error::CoreError;

/// Default entry lifetime: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Invalidation tags for the platform's data families. A tag doubles as a
/// key substring: every cache key for campaign data contains `campaigns`,
/// so `invalidate_by_tags(&[tags::CAMPAIGNS])` clears them all.
pub mod tags {
    pub const CAMPAIGNS: &str = "campaigns";
    pub const PROSPECTS: &str = "prospects";
    pub const LANDINGPAGES: &str = "landingpages";
    pub const USER: &str = "user";
}

#[derive(Debug, Clone, Copy)]
pub struct CacheOptions {
    pub ttl: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheOptions {
    pub fn ttl(ttl: Duration) -> Self {
        Self { ttl }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.inserted_at + self.ttl
    }
}

/// Counters for the cache debugging surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// In-memory TTL cache. Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct CacheService {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl CacheService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh value for `key`, if any. Expired entries are evicted on read
    /// -- there is no background sweep.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return entry.value.downcast_ref::<T>().cloned();
            }
        }
        trace!(key, "evicting expired cache entry");
        self.entries.remove(key);
        None
    }

    /// Store a value, overwriting unconditionally.
    pub fn insert<T: Send + Sync + 'static>(&self, key: &str, value: T, options: CacheOptions) {
        self.entries.insert(
            key.to_owned(),
            CacheEntry {
                value: Arc::new(value),
                inserted_at: Instant::now(),
                ttl: options.ttl,
            },
        );
    }

    /// Delete every key containing `pattern` as a literal substring.
    pub fn invalidate(&self, pattern: &str) {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().contains(pattern))
            .map(|entry| entry.key().clone())
            .collect();
        for key in doomed {
            trace!(key, pattern, "invalidating cache entry");
            self.entries.remove(&key);
        }
    }

    /// Invalidate per tag; tags double as key substrings.
    pub fn invalidate_by_tags(&self, tags: &[&str]) {
        for tag in tags {
            self.invalidate(tag);
        }
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let total_entries = self.entries.len();
        let expired_entries = self
            .entries
            .iter()
            .filter(|entry| entry.is_expired(now))
            .count();
        CacheStats {
            total_entries,
            valid_entries: total_entries - expired_entries,
            expired_entries,
        }
    }

    /// Read-through: return the cached value when fresh, otherwise run
    /// `fetcher`, store the result, and return it.
    ///
    /// Concurrent callers missing on the same key each run their own
    /// fetch; the last write wins. Deduplicating here would change how
    /// often revalidation observes fresh fetches, so the stampede is
    /// accepted and documented.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &str,
        options: CacheOptions,
        fetcher: F,
    ) -> Result<T, CoreError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        if let Some(cached) = self.get::<T>(key) {
            trace!(key, "cache hit");
            return Ok(cached);
        }

        trace!(key, "cache miss; fetching");
        let value = fetcher().await?;
        self.insert(key, value.clone(), options);
        Ok(value)
    }
}
