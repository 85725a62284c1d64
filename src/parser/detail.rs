//! Detail page extraction
//!
//! Each field has its own extractor over the parsed document so a template
//! change only touches the function for the affected field.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::{absolutize_url, element_text, selector, DownloadLink, MovieDetails};
use crate::constants::markers;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1.entry-title"));
static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:image"]"#));
static CONTENT_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("div.entry-content p img"));
static CONTENT_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("div.entry-content > p"));
static RELEASE_DATE: LazyLock<Selector> =
    LazyLock::new(|| selector("div.post-meta-wrap .date-time time"));
static PLAYER_IFRAME: LazyLock<Selector> = LazyLock::new(|| selector("div.tabs__content iframe"));
static GROUP_HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h5"));
static BUTTON_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.btn"));
static BUTTON_LABEL: LazyLock<Selector> = LazyLock::new(|| selector("button.dwd-button"));
static SECTION_HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static GALLERY: LazyLock<Selector> = LazyLock::new(|| selector("div.container"));
static GALLERY_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("p img"));
static TAG_LINK: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[rel="tag"]"#));

static IMDB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tt\d+").expect("IMDB id pattern must compile"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern must compile"));

/// Fields of the "IMDb Rating: ... <br> Release Year: ..." info block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoField {
    Rating,
    MovieName,
    Year,
    Language,
    Size,
    Format,
    Runtime,
    Quality,
    Genres,
    Writers,
    Cast,
    Director,
}

/// Labels in priority order; the first label found in a line claims it.
const INFO_LABELS: &[(InfoField, &[&str])] = &[
    (InfoField::Rating, &["IMDb Rating:"]),
    (InfoField::MovieName, &["Movie Name:"]),
    (InfoField::Year, &["Release Year:"]),
    (InfoField::Language, &["Language:"]),
    (InfoField::Size, &["Size:"]),
    (InfoField::Format, &["Format:"]),
    (InfoField::Runtime, &["Runtime :", "Runtime:"]),
    (InfoField::Quality, &["Quality:"]),
    (InfoField::Genres, &["Genres:"]),
    (InfoField::Writers, &["Writers:"]),
    (InfoField::Cast, &["Cast:"]),
    (InfoField::Director, &["Director:"]),
];

#[derive(Debug, Default, PartialEq)]
struct MovieInfo {
    rating: Option<String>,
    movie_name: Option<String>,
    year: Option<String>,
    language: Option<String>,
    size: Option<String>,
    format: Option<String>,
    runtime: Option<String>,
    quality: Option<String>,
    genres: Option<String>,
    writers: Option<String>,
    cast: Option<String>,
    director: Option<String>,
}

impl MovieInfo {
    fn set(&mut self, field: InfoField, value: String) {
        let slot = match field {
            InfoField::Rating => &mut self.rating,
            InfoField::MovieName => &mut self.movie_name,
            InfoField::Year => &mut self.year,
            InfoField::Language => &mut self.language,
            InfoField::Size => &mut self.size,
            InfoField::Format => &mut self.format,
            InfoField::Runtime => &mut self.runtime,
            InfoField::Quality => &mut self.quality,
            InfoField::Genres => &mut self.genres,
            InfoField::Writers => &mut self.writers,
            InfoField::Cast => &mut self.cast,
            InfoField::Director => &mut self.director,
        };
        *slot = Some(value);
    }
}

/// Parse a movie detail page
///
/// # Arguments
/// * `html` - The HTML content to parse
/// * `path` - Site-relative path the page was fetched from
/// * `base_url` - Upstream origin used to absolutize image URLs
///
/// # Returns
/// `None` when the page has no entry title, i.e. there is no movie on it
pub fn parse_movie_details(html: &str, path: &str, base_url: &str) -> Option<MovieDetails> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?;

    let paragraphs = extract_paragraphs(&document);
    let description = if paragraphs.is_empty() {
        markers::NO_DESCRIPTION.to_string()
    } else {
        paragraphs.join("\n\n")
    };

    let info = extract_movie_info(&document);

    Some(MovieDetails {
        title,
        image_url: extract_image(&document, base_url),
        path: path.to_string(),
        description,
        paragraphs,
        download_links: extract_download_links(&document),
        category: info.genres,
        release_date: extract_release_date(&document),
        tags: extract_tags(&document),
        imdb_id: extract_imdb_id(&document),
        year: info.year,
        screenshots: extract_screenshots(&document, base_url),
        rating: info.rating,
        language: info.language,
        size: info.size,
        format: info.format,
        duration: info.runtime,
        quality: info.quality,
        writers: info.writers,
        stars: info.cast,
        director: info.director,
        synopsis: extract_synopsis(&document),
        movie_name: info.movie_name,
    })
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// og:image first, then the first cover upload inside the content.
///
/// A bare og:image file name lives under the covers directory; rooted and
/// absolute values are resolved against the origin as they are.
fn extract_image(document: &Html, base_url: &str) -> Option<String> {
    let og_image = document
        .select(&OG_IMAGE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty());

    if let Some(content) = og_image {
        let url = if content.starts_with("http") || content.starts_with('/') {
            absolutize_url(base_url, content)
        } else {
            format!("{}{}{}", base_url, markers::COVER_UPLOADS, content)
        };
        return Some(url);
    }

    document
        .select(&CONTENT_IMAGE)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.contains(markers::COVER_UPLOADS))
        .map(|src| absolutize_url(base_url, src.trim()))
}

/// Content paragraphs minus promo text and the info block.
///
/// When more than one survives, the last one is dropped: on the upstream
/// template it is the disclaimer footer. Pages whose real plot is the last
/// paragraph lose it.
fn extract_paragraphs(document: &Html) -> Vec<String> {
    let mut paragraphs: Vec<String> = document
        .select(&CONTENT_PARAGRAPH)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .filter(|text| {
            let lower = text.to_lowercase();
            !markers::PROMO_TEXT.iter().any(|promo| lower.contains(promo))
        })
        .filter(|text| !text.contains(markers::IMDB_RATING))
        .collect();

    if paragraphs.len() > 1 {
        paragraphs.pop();
    }

    paragraphs
}

fn extract_release_date(document: &Html) -> Option<String> {
    document
        .select(&RELEASE_DATE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn extract_imdb_id(document: &Html) -> Option<String> {
    let src = document
        .select(&PLAYER_IFRAME)
        .next()
        .and_then(|iframe| iframe.value().attr("src"))?;

    IMDB_ID.find(src).map(|m| m.as_str().to_string())
}

/// Download buttons grouped under their `h5` heading.
///
/// A heading whose text mentions "download" or "g-direct" opens a group that
/// runs over the following siblings until the next `h5`.
fn extract_download_links(document: &Html) -> Vec<DownloadLink> {
    let mut links = Vec::new();

    for heading in document.select(&GROUP_HEADING) {
        let group_title = element_text(heading);
        let lower = group_title.to_lowercase();
        if !lower.contains("download") && !lower.contains("g-direct") {
            continue;
        }

        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            if sibling.value().name() == "h5" {
                break;
            }

            for anchor in self_and_descendants(sibling, &BUTTON_LINK) {
                let Some(href) = anchor
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                else {
                    continue;
                };

                let label = anchor
                    .select(&BUTTON_LABEL)
                    .next()
                    .map(element_text)
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| element_text(anchor));

                links.push(download_link(href, &label, &group_title));
            }
        }
    }

    links
}

fn download_link(href: &str, label: &str, group_title: &str) -> DownloadLink {
    let quality = label.split('[').next().unwrap_or_default().trim();

    DownloadLink {
        url: href.to_string(),
        title: if label.is_empty() {
            markers::DEFAULT_DOWNLOAD_LABEL.to_string()
        } else {
            label.to_string()
        },
        quality: if quality.is_empty() {
            markers::DEFAULT_DOWNLOAD_LABEL.to_string()
        } else {
            quality.to_string()
        },
        group_title: Some(group_title.to_string()).filter(|g| !g.is_empty()),
    }
}

/// `el` itself when it matches, followed by its matching descendants
fn self_and_descendants<'a>(el: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    let mut matches = Vec::new();
    if selector.matches(&el) {
        matches.push(el);
    }
    matches.extend(el.select(selector).filter(|d| d.id() != el.id()));
    matches
}

/// Images of the gallery right after a "Screenshots" heading
fn extract_screenshots(document: &Html, base_url: &str) -> Vec<String> {
    let mut screenshots = Vec::new();

    for heading in document.select(&SECTION_HEADING) {
        if !element_text(heading).contains(markers::SCREENSHOTS) {
            continue;
        }

        let Some(gallery) = heading.next_siblings().find_map(ElementRef::wrap) else {
            continue;
        };
        if !GALLERY.matches(&gallery) {
            continue;
        }

        screenshots.extend(
            gallery
                .select(&GALLERY_IMAGE)
                .filter_map(|img| img.value().attr("src"))
                .map(str::trim)
                .filter(|src| !src.is_empty())
                .map(|src| absolutize_url(base_url, src)),
        );
    }

    screenshots
}

fn extract_synopsis(document: &Html) -> Option<String> {
    let heading = document
        .select(&SECTION_HEADING)
        .find(|h| element_text(*h).to_uppercase().contains(markers::SYNOPSIS))?;

    let next = heading.next_siblings().find_map(ElementRef::wrap)?;
    if next.value().name() != "p" {
        return None;
    }

    Some(element_text(next)).filter(|t| !t.is_empty())
}

fn extract_tags(document: &Html) -> Vec<String> {
    let mut seen = HashSet::new();

    document
        .select(&TAG_LINK)
        .map(element_text)
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Read the info block: the content paragraph carrying "IMDb Rating:", one
/// "Label: value" pair per `<br>`-separated line.
fn extract_movie_info(document: &Html) -> MovieInfo {
    let mut info = MovieInfo::default();

    let Some(paragraph) = document
        .select(&CONTENT_PARAGRAPH)
        .find(|p| p.text().collect::<String>().contains(markers::IMDB_RATING))
    else {
        return info;
    };

    for line in LINE_BREAK.split(&paragraph.inner_html()) {
        let text = fragment_text(line);
        if let Some((field, value)) = match_info_line(&text) {
            info.set(field, value);
        }
    }

    info
}

fn fragment_text(markup: &str) -> String {
    Html::parse_fragment(markup)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

fn match_info_line(line: &str) -> Option<(InfoField, String)> {
    for (field, labels) in INFO_LABELS {
        let Some((label, idx)) = labels
            .iter()
            .find_map(|label| line.find(label).map(|idx| (label, idx)))
        else {
            continue;
        };

        let mut value = line[idx + label.len()..].trim().to_string();
        if *field == InfoField::Rating {
            value = strip_leading_symbols(&value.replace('👉', ""));
        }

        if value.is_empty() {
            return None;
        }
        return Some((*field, value));
    }

    None
}

/// Drop emoji and bullets in front of a value ("⭐ 7.5/10" -> "7.5/10")
fn strip_leading_symbols(value: &str) -> String {
    value
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .to_string()
}
