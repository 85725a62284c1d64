//! Scraper module for fetching HTML content from the upstream origin
//!
//! This module provides an HTTP client with browser-like headers and a
//! time-based HTML cache. Callers use [`Scraper::fetch_html`], which never
//! fails: every transport or status error is logged and collapsed to `None`.

pub mod cache;

use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

pub use cache::HtmlCache;

/// Errors that can occur during scraping operations
#[derive(Error, Debug)]
pub enum ScraperError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Network-related errors (connection timeout, DNS failure, etc.)
    #[error("Failed to connect to server: {0}")]
    NetworkError(String),

    /// HTTP non-2xx status code errors
    #[error("Server returned status {0}")]
    HttpError(u16),

    /// Error reading response body
    #[error("Failed to read response body: {0}")]
    ResponseError(String),
}

/// Configuration for the HTTP client and cache
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Browser user agent sent with every request
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// Upper bound for a whole request
    pub timeout: Duration,
    /// Upper bound for establishing a connection
    pub connect_timeout: Duration,
    /// Freshness window of cached pages
    pub cache_ttl: Duration,
    /// Upper bound on cached pages
    pub cache_max_entries: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(3600),
            cache_max_entries: cache::DEFAULT_MAX_ENTRIES,
        }
    }
}

/// The upstream rejects requests without a browser user agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// HTTP client for fetching upstream pages through the HTML cache
pub struct Scraper {
    client: Client,
    config: ScraperConfig,
    cache: HtmlCache,
    request_count: AtomicUsize,
}

impl Scraper {
    /// Create a new Scraper with default configuration
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new Scraper with custom configuration
    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ScraperError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            cache: HtmlCache::with_max_entries(config.cache_ttl, config.cache_max_entries),
            config,
            request_count: AtomicUsize::new(0),
        })
    }

    /// Fetch HTML for `url`, serving it from the cache while fresh.
    ///
    /// Returns `None` on any network error or non-2xx status.
    pub async fn fetch_html(&self, url: &str) -> Option<String> {
        if let Some(html) = self.cache.get(url) {
            debug!("Cache hit for URL: {}", url);
            return Some(html);
        }

        match self.fetch_page(url).await {
            Ok(html) => {
                self.cache.purge_expired();
                self.cache.insert(url, html.clone());
                Some(html)
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }

    /// Fetch a page from the network, bypassing the cache
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        info!("Fetching URL: {}", url);
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.config.user_agent)
            .header("Accept", ACCEPT)
            .header("Accept-Language", &self.config.accept_language)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScraperError::NetworkError("Connection timeout".to_string())
                } else if e.is_connect() {
                    ScraperError::NetworkError("Failed to connect to server".to_string())
                } else {
                    ScraperError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpError(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScraperError::ResponseError(e.to_string()))?;

        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }

    /// Number of network requests issued so far (cache hits excluded)
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// The HTML cache backing [`Scraper::fetch_html`]
    pub fn cache(&self) -> &HtmlCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockUpstream;

    #[test]
    fn test_scraper_creation() {
        let scraper = Scraper::new().unwrap();
        assert_eq!(scraper.request_count(), 0);
        assert!(scraper.cache().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = ScraperConfig::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.accept_language, "en-US,en;q=0.9");
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ScraperError::HttpError(503).to_string(),
            "Server returned status 503"
        );
    }

    #[actix_rt::test]
    async fn test_fetch_html_success_is_cached() {
        let upstream = MockUpstream::start(vec![("/", 200, "<html>home</html>".to_string())]);
        let scraper = Scraper::new().unwrap();
        let url = upstream.url("/");

        assert_eq!(scraper.fetch_html(&url).await.as_deref(), Some("<html>home</html>"));
        assert_eq!(scraper.fetch_html(&url).await.as_deref(), Some("<html>home</html>"));

        assert_eq!(upstream.hits(), 1);
        assert_eq!(scraper.request_count(), 1);
    }

    #[actix_rt::test]
    async fn test_fetch_html_refetches_when_stale() {
        let upstream = MockUpstream::start(vec![("/", 200, "<html>home</html>".to_string())]);
        let scraper = Scraper::with_config(ScraperConfig {
            cache_ttl: Duration::ZERO,
            ..ScraperConfig::default()
        })
        .unwrap();
        let url = upstream.url("/");

        assert!(scraper.fetch_html(&url).await.is_some());
        assert!(scraper.fetch_html(&url).await.is_some());
        assert_eq!(upstream.hits(), 2);
    }

    #[actix_rt::test]
    async fn test_fetch_html_non_success_is_none() {
        let upstream = MockUpstream::start(vec![("/gone/", 500, "boom".to_string())]);
        let scraper = Scraper::new().unwrap();

        assert!(scraper.fetch_html(&upstream.url("/gone/")).await.is_none());
        assert!(scraper.fetch_html(&upstream.url("/missing/")).await.is_none());
        assert!(scraper.cache().is_empty());
    }

    #[actix_rt::test]
    async fn test_distinct_urls_are_capped() {
        let pages: Vec<(String, u16, String)> = (0..5)
            .map(|i| (format!("/?s=q{}", i), 200, format!("results {}", i)))
            .collect();
        let upstream = MockUpstream::start(
            pages
                .iter()
                .map(|(path, status, body)| (path.as_str(), *status, body.clone()))
                .collect(),
        );
        let scraper = Scraper::with_config(ScraperConfig {
            cache_max_entries: 3,
            ..ScraperConfig::default()
        })
        .unwrap();

        for (path, _, _) in &pages {
            assert!(scraper.fetch_html(&upstream.url(path)).await.is_some());
        }
        assert_eq!(scraper.cache().len(), 3);

        // The first query was evicted and goes back to the network
        scraper.fetch_html(&upstream.url("/?s=q0")).await;
        assert_eq!(upstream.hits(), 6);
    }

    #[actix_rt::test]
    async fn test_fetch_page_reports_status() {
        let upstream = MockUpstream::start(vec![("/gone/", 503, String::new())]);
        let scraper = Scraper::new().unwrap();

        let err = scraper.fetch_page(&upstream.url("/gone/")).await.unwrap_err();
        assert!(matches!(err, ScraperError::HttpError(503)));
    }

    #[actix_rt::test]
    async fn test_fetch_html_connection_refused_is_none() {
        let scraper = Scraper::new().unwrap();
        assert!(scraper.fetch_html("http://127.0.0.1:9/").await.is_none());
    }

    #[actix_rt::test]
    async fn test_browser_headers_are_sent() {
        let upstream = MockUpstream::start(vec![("/", 200, "ok".to_string())]);
        let scraper = Scraper::new().unwrap();

        scraper.fetch_html(&upstream.url("/")).await;

        let headers = upstream.last_headers();
        assert!(headers.user_agent.unwrap_or_default().starts_with("Mozilla/5.0"));
        assert_eq!(headers.accept_language.as_deref(), Some("en-US,en;q=0.9"));
    }
}
