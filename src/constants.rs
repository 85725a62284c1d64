//! Constants module for the Movie Mirror service
//!
//! Contains endpoint URL builders that use the base URL from configuration,
//! the hand-curated navigation lists, and the text markers the parser keys on.

/// URL builder functions for all upstream pages
pub mod endpoints {
    /// Pagination suffix, empty for the first page
    fn page_suffix(page: u32) -> String {
        if page > 1 {
            format!("page/{}/", page)
        } else {
            String::new()
        }
    }

    /// Home page URL
    pub fn home(base_url: &str, page: u32) -> String {
        if page > 1 {
            format!("{}/{}", base_url, page_suffix(page))
        } else {
            base_url.to_string()
        }
    }

    /// Search URL with query parameter
    pub fn search(base_url: &str, query: &str, page: u32) -> String {
        format!(
            "{}/{}?s={}",
            base_url,
            page_suffix(page),
            urlencoding::encode(query)
        )
    }

    /// Category listing URL
    ///
    /// Accepts `slug`, `/slug/` or `/category/slug`; the upstream serves
    /// category listings at the root, so a leading `/category` is dropped.
    pub fn category(base_url: &str, path: &str, page: u32) -> String {
        let mut base_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        if let Some(rest) = base_path.strip_prefix("/category") {
            if rest.is_empty() || rest.starts_with('/') {
                base_path = rest.to_string();
            }
        }

        if !base_path.ends_with('/') {
            base_path.push('/');
        }

        format!("{}{}{}", base_url, base_path, page_suffix(page))
    }

    /// Movie detail page URL
    pub fn movie(base_url: &str, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", base_url, path)
        } else {
            format!("{}/{}", base_url, path)
        }
    }
}

/// Navigation entries used when categories are not scraped
pub mod navigation {
    /// Hand-curated primary navigation as (name, path)
    pub const STATIC_CATEGORIES: &[(&str, &str)] = &[
        ("Dual Audio [Hindi] 720P", "/category/dual-audio-hindi-english-movies/"),
        ("Hollywood Movies 1080P", "/category/hollywood-movies/"),
        ("Telugu", "/category/telugu-movies-free-download/"),
        ("Action", "/category/action/"),
        ("Adventure", "/category/adventure/"),
        ("Animation", "/category/animation/"),
        ("Cartoon", "/category/cartoon/"),
        ("Comedy", "/category/comedy/"),
        ("Crime", "/category/crime/"),
        ("Documentary", "/category/documentary/"),
        ("Drama", "/category/drama/"),
        ("Family", "/category/family/"),
        ("Fantasy", "/category/fantasy/"),
        ("History", "/category/history/"),
        ("Horror", "/category/horror/"),
        ("Mystery", "/category/mystery/"),
        ("Romance", "/category/romance/"),
        ("Thriller", "/category/thriller/"),
        ("War", "/category/war/"),
        ("Web Series", "/category/tv-shows/"),
        ("Tamil 720P", "/category/tamil-movies/"),
        ("Pakistani", "/category/pakistani-movies/"),
        ("Punjabi Movies 720P", "/category/punjabi-movies/"),
    ];

    /// Returned when the scraped menu comes back empty
    pub const FALLBACK_CATEGORIES: &[(&str, &str)] = &[
        ("Bollywood", "/category/bollywood/"),
        ("Hollywood", "/category/hollywood/"),
        ("South Hindi", "/category/south-hindi-dubbed-movies/"),
        ("Web Series", "/category/web-series/"),
        ("TV Shows", "/category/tv-shows/"),
    ];
}

/// Text markers in the upstream template
pub mod markers {
    /// Paragraph holding the tabular movie info
    pub const IMDB_RATING: &str = "IMDb Rating:";

    /// Lowercase fragments of site-promo paragraphs
    pub const PROMO_TEXT: &[&str] = &["vegamovies.you is the best"];

    /// Path fragment of cover uploads
    pub const COVER_UPLOADS: &str = "/uploads/posts/covers/";

    /// Heading above the screenshot gallery
    pub const SCREENSHOTS: &str = "Screenshots";

    /// Heading above the plot paragraph
    pub const SYNOPSIS: &str = "SYNOPSIS/PLOT";

    /// Used when no description paragraph survives filtering
    pub const NO_DESCRIPTION: &str = "No description available.";

    /// Fallback label for a download button with no text
    pub const DEFAULT_DOWNLOAD_LABEL: &str = "Download";

    /// Bucket for links that carry no group title
    pub const DEFAULT_DOWNLOAD_GROUP: &str = "Downloads";
}
