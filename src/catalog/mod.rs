//! Catalog operations served to the display layer
//!
//! Each operation derives an upstream URL, fetches it through the cached
//! [`Scraper`] and parses the result. Failures never escape: a failed fetch
//! reads as an empty list or `None`, exactly like a page with no content.

use tracing::{info, warn};

use crate::config::{CategorySource, Config};
use crate::constants::endpoints;
use crate::parser::{
    fallback_categories, parse_menu_categories, parse_movie_details, parse_movies,
    parse_recent_posts, static_categories, Category, Movie, MovieDetails, RecentPost,
};
use crate::scraper::{Scraper, ScraperConfig, ScraperError};

/// Read-only view of the upstream site
pub struct Catalog {
    scraper: Scraper,
    base_url: String,
    category_source: CategorySource,
}

impl Catalog {
    /// Create a catalog over `base_url` using an existing scraper
    pub fn new(scraper: Scraper, base_url: impl Into<String>, category_source: CategorySource) -> Self {
        Self {
            scraper,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            category_source,
        }
    }

    /// Build the scraper and catalog described by the application config
    pub fn from_config(config: &Config) -> Result<Self, ScraperError> {
        let scraper = Scraper::with_config(ScraperConfig {
            timeout: config.request_timeout,
            cache_ttl: config.cache_ttl,
            cache_max_entries: config.cache_max_entries,
            ..ScraperConfig::default()
        })?;

        Ok(Self::new(scraper, config.base_url.clone(), config.category_source))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scraper(&self) -> &Scraper {
        &self.scraper
    }

    async fn fetch_movies(&self, url: &str) -> Vec<Movie> {
        let Some(html) = self.scraper.fetch_html(url).await else {
            return Vec::new();
        };

        let movies = parse_movies(&html, &self.base_url);
        info!("Parsed {} movies from {}", movies.len(), url);
        movies
    }

    /// Movies on the given homepage page (1-based)
    pub async fn get_homepage_movies(&self, page: u32) -> Vec<Movie> {
        self.fetch_movies(&endpoints::home(&self.base_url, page)).await
    }

    /// Search results for `query` on the given page
    pub async fn get_search_results(&self, query: &str, page: u32) -> Vec<Movie> {
        self.fetch_movies(&endpoints::search(&self.base_url, query, page))
            .await
    }

    /// Movies of a category; `path` may be a slug or a "/category/..." path
    pub async fn get_category_movies(&self, path: &str, page: u32) -> Vec<Movie> {
        self.fetch_movies(&endpoints::category(&self.base_url, path, page))
            .await
    }

    /// Details of the movie at `path`, `None` when missing or unreachable
    pub async fn get_movie_details(&self, path: &str) -> Option<MovieDetails> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let html = self
            .scraper
            .fetch_html(&endpoints::movie(&self.base_url, &path))
            .await?;

        let details = parse_movie_details(&html, &path, &self.base_url);
        if details.is_none() {
            warn!("No movie title found at {}", path);
        }
        details
    }

    /// Navigation categories; never empty
    pub async fn get_categories(&self) -> Vec<Category> {
        match self.category_source {
            CategorySource::Static => static_categories(),
            CategorySource::Menu => {
                let scraped = match self
                    .scraper
                    .fetch_html(&endpoints::home(&self.base_url, 1))
                    .await
                {
                    Some(html) => parse_menu_categories(&html, &self.base_url),
                    None => Vec::new(),
                };

                if scraped.is_empty() {
                    warn!("No categories found in the primary menu, using fallback list");
                    fallback_categories()
                } else {
                    scraped
                }
            }
        }
    }

    /// Entries of the homepage "recent posts" widget
    pub async fn get_recent_posts(&self) -> Vec<RecentPost> {
        match self
            .scraper
            .fetch_html(&endpoints::home(&self.base_url, 1))
            .await
        {
            Some(html) => parse_recent_posts(&html, &self.base_url),
            None => Vec::new(),
        }
    }
}
