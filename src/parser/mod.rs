//! Parser module for extracting structured data from HTML
//!
//! This module turns the upstream WordPress markup into typed records. Every
//! extractor is best-effort: a missing element yields an absent field or an
//! empty list, never an error.

mod detail;
mod navigation;

pub use detail::parse_movie_details;
pub use navigation::{fallback_categories, parse_menu_categories, parse_recent_posts, static_categories};

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;
use utoipa::ToSchema;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector literal must be valid CSS")
}

static ARTICLE: LazyLock<Selector> = LazyLock::new(|| selector("article.post-item"));
static ENTRY_TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("h3.entry-title a"));
static COVER_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img.blog-picture"));

/// A movie card from a listing page (home, category, search)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// From h3.entry-title a
    pub title: String,
    /// Absolute URL from img.blog-picture
    pub image_url: String,
    /// Site-relative path of the detail page (e.g. "/some-movie-2021/")
    pub path: String,
}

/// One download button on a detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub url: String,
    /// Full button label
    pub title: String,
    /// Button label up to the first `[`
    pub quality: String,
    /// Heading the link was listed under (e.g. "1080p Downloads")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_title: Option<String>,
}

/// Full movie information from a detail page
///
/// Only `title` is guaranteed; everything else is filled when the upstream
/// template happens to carry it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    /// From h1.entry-title
    pub title: String,
    /// From og:image, or the first cover upload in the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Site-relative path the details were requested for
    pub path: String,
    /// Paragraphs joined by blank lines
    pub description: String,
    /// Content paragraphs without promo and metadata paragraphs
    pub paragraphs: Vec<String>,
    pub download_links: Vec<DownloadLink>,
    /// "Genres:" line of the movie info block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Post timestamp text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Post tags, de-duplicated, in page order
    pub tags: Vec<String>,
    /// IMDB id from the embedded player (e.g. "tt1234567")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub screenshots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// "Runtime" line of the movie info block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writers: Option<String>,
    /// "Cast:" line of the movie info block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Plot paragraph under the synopsis heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    /// "Movie Name:" line of the movie info block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_name: Option<String>,
}

impl MovieDetails {
    /// Individual genres from the comma-separated `category` line
    pub fn genres(&self) -> Vec<String> {
        self.category
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect()
    }
}

/// A navigation entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub path: String,
}

/// An entry of the "recent posts" sidebar widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentPost {
    pub title: String,
    pub path: String,
}

/// Trimmed text content of an element
fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Resolve an image or link URL against the upstream origin.
///
/// Anything starting with "http" passes through unchanged.
pub fn absolutize_url(base_url: &str, src: &str) -> String {
    if src.starts_with("http") {
        src.to_string()
    } else if src.starts_with("//") {
        format!("https:{}", src)
    } else if src.starts_with('/') {
        format!("{}{}", base_url, src)
    } else {
        format!("{}/{}", base_url, src)
    }
}

/// Reduce a link to its URL path (e.g. "https://host/a-movie/?x=1" -> "/a-movie/")
pub fn url_path(href: &str, base_url: &str) -> String {
    match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => Url::parse(base_url)
            .and_then(|base| base.join(href))
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| href.to_string()),
    }
}

/// Parse movie cards from a listing page
///
/// Extracts data from elements matching `article.post-item`. Cards missing a
/// title, link or image are skipped, and a link seen earlier in the page is
/// not repeated.
///
/// # Arguments
/// * `html` - The HTML content to parse
/// * `base_url` - Upstream origin used to absolutize relative image URLs
///
/// # Returns
/// Movies in document order; empty when nothing matches
pub fn parse_movies(html: &str, base_url: &str) -> Vec<Movie> {
    let document = Html::parse_document(html);

    let mut movies = Vec::new();
    let mut seen_paths = HashSet::new();

    for article in document.select(&ARTICLE) {
        let link = article.select(&ENTRY_TITLE_LINK).next();

        let href = link
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .unwrap_or_default();

        let title = link.map(element_text).unwrap_or_default();

        let image = article
            .select(&COVER_IMAGE)
            .next()
            .and_then(|img| {
                img.value()
                    .attr("src")
                    .filter(|src| !src.trim().is_empty())
                    .or_else(|| img.value().attr("data-src"))
            })
            .map(str::trim)
            .unwrap_or_default();

        if href.is_empty() || title.is_empty() || image.is_empty() {
            continue;
        }

        if !seen_paths.insert(href.to_string()) {
            continue;
        }

        movies.push(Movie {
            title,
            image_url: absolutize_url(base_url, image),
            path: url_path(href, base_url),
        });
    }

    movies
}
