//! Time-based HTML cache keyed by request URL
//!
//! Entries are immutable snapshots. A read only returns an entry while its
//! age is below the freshness window; stale entries are simply overwritten by
//! the next successful fetch. The number of entries is capped, and inserting
//! into a full cache evicts the page fetched longest ago.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// A cached page body and when it was fetched
#[derive(Debug, Clone)]
struct CachedPage {
    html: String,
    fetched_at: Instant,
}

/// Default upper bound on cached pages
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// URL -> HTML cache with a fixed freshness window and entry cap
#[derive(Debug)]
pub struct HtmlCache {
    entries: RwLock<HashMap<String, CachedPage>>,
    ttl: Duration,
    max_entries: usize,
}

impl HtmlCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_max_entries(ttl, DEFAULT_MAX_ENTRIES)
    }

    /// A cache holding at most `max_entries` pages; zero disables caching
    pub fn with_max_entries(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Freshness window of this cache
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the cached HTML for `url` if it is still fresh
    pub fn get(&self, url: &str) -> Option<String> {
        self.get_at(url, Instant::now())
    }

    /// Same as [`HtmlCache::get`] with an explicit "now"
    pub fn get_at(&self, url: &str, now: Instant) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let page = entries.get(url)?;

        if now.saturating_duration_since(page.fetched_at) < self.ttl {
            Some(page.html.clone())
        } else {
            None
        }
    }

    /// Store a freshly fetched page
    pub fn insert(&self, url: &str, html: String) {
        self.insert_at(url, html, Instant::now());
    }

    /// Same as [`HtmlCache::insert`] with an explicit fetch time
    pub fn insert_at(&self, url: &str, html: String, fetched_at: Instant) {
        if self.max_entries == 0 {
            return;
        }

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if !entries.contains_key(url) {
            while entries.len() >= self.max_entries {
                let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, page)| page.fetched_at)
                    .map(|(key, _)| key.clone())
                else {
                    break;
                };
                entries.remove(&oldest);
            }
        }
        entries.insert(url.to_string(), CachedPage { html, fetched_at });
    }

    /// Drop every entry that is no longer fresh, returning how many went
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, page| now.saturating_duration_since(page.fetched_at) < self.ttl);
        before - entries.len()
    }

    /// Number of entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
