//! Configuration module for the Movie Mirror service
//!
//! Handles loading environment variables and application configuration.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("CATEGORY_SOURCE must be \"static\" or \"menu\", got {0:?}")]
    InvalidCategorySource(String),
}

/// Where the navigation category list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySource {
    /// Hand-curated list, no network access
    #[default]
    Static,
    /// Scraped from the upstream primary menu, with a static fallback
    Menu,
}

impl CategorySource {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "" | "static" => Ok(CategorySource::Static),
            "menu" => Ok(CategorySource::Menu),
            _ => Err(ConfigError::InvalidCategorySource(value.to_string())),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Upstream origin that gets mirrored, without a trailing slash
    pub base_url: String,
    /// How long a fetched page stays fresh in the HTML cache
    pub cache_ttl: Duration,
    /// Maximum number of pages held in the HTML cache
    pub cache_max_entries: usize,
    /// Upper bound for a single upstream request
    pub request_timeout: Duration,
    /// Strategy for the navigation category list
    pub category_source: CategorySource,
    /// Player embed prefix, the IMDB id is appended to it
    pub player_embed_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: "https://vegamovies.you".to_string(),
            cache_ttl: Duration::from_secs(3600),
            cache_max_entries: crate::scraper::cache::DEFAULT_MAX_ENTRIES,
            request_timeout: Duration::from_secs(30),
            category_source: CategorySource::Static,
            player_embed_base: "https://vidsrc.to/embed/movie".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(value) => parse_number::<u16>("PORT", &value)?,
            None => defaults.port,
        };

        let cache_ttl = match lookup("CACHE_TTL_SECS") {
            Some(value) => Duration::from_secs(parse_number("CACHE_TTL_SECS", &value)?),
            None => defaults.cache_ttl,
        };

        let cache_max_entries = match lookup("CACHE_MAX_ENTRIES") {
            Some(value) => parse_number("CACHE_MAX_ENTRIES", &value)?,
            None => defaults.cache_max_entries,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_number("REQUEST_TIMEOUT_SECS", &value)?),
            None => defaults.request_timeout,
        };

        let category_source = match lookup("CATEGORY_SOURCE") {
            Some(value) => CategorySource::parse(&value)?,
            None => defaults.category_source,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            base_url: lookup("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            cache_ttl,
            cache_max_entries,
            request_timeout,
            category_source,
            player_embed_base: lookup("PLAYER_EMBED_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.player_embed_base),
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}
