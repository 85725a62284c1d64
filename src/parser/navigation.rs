//! Navigation extraction: primary-menu categories and the recent-posts widget

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::{element_text, selector, url_path, Category, RecentPost};
use crate::constants::navigation::{FALLBACK_CATEGORIES, STATIC_CATEGORIES};

static MENU_LINK: LazyLock<Selector> = LazyLock::new(|| {
    selector("ul#menu-primary-menu > li.menu-item-has-children > ul.sub-menu > li > a")
});
static RECENT_POST_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("#recent-posts-2 ul li a"));

fn to_categories(entries: &[(&str, &str)]) -> Vec<Category> {
    entries
        .iter()
        .map(|(name, path)| Category {
            name: name.to_string(),
            path: path.to_string(),
        })
        .collect()
}

/// The hand-curated navigation list
pub fn static_categories() -> Vec<Category> {
    to_categories(STATIC_CATEGORIES)
}

/// Shown when the scraped menu has nothing to offer
pub fn fallback_categories() -> Vec<Category> {
    to_categories(FALLBACK_CATEGORIES)
}

/// Parse category links from the primary menu's sub-menus
///
/// Only links under `/category/` are kept; a name seen before is skipped.
pub fn parse_menu_categories(html: &str, base_url: &str) -> Vec<Category> {
    let document = Html::parse_document(html);

    let mut categories = Vec::new();
    let mut seen_names = HashSet::new();

    for link in document.select(&MENU_LINK) {
        let name = element_text(link);
        let href = link.value().attr("href").map(str::trim).unwrap_or_default();

        if name.is_empty() || href.is_empty() || seen_names.contains(&name) {
            continue;
        }

        let path = url_path(href, base_url);
        if path.starts_with("/category/") {
            seen_names.insert(name.clone());
            categories.push(Category { name, path });
        }
    }

    categories
}

/// Parse the "recent posts" sidebar widget
pub fn parse_recent_posts(html: &str, base_url: &str) -> Vec<RecentPost> {
    let document = Html::parse_document(html);

    document
        .select(&RECENT_POST_LINK)
        .filter_map(|link| {
            let title = element_text(link);
            let href = link.value().attr("href").map(str::trim).unwrap_or_default();

            if title.is_empty() || href.is_empty() {
                return None;
            }

            Some(RecentPost {
                title,
                path: url_path(href, base_url),
            })
        })
        .collect()
}
