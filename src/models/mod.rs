//! Data models for the Movie Mirror API
//!
//! This module contains the response wrappers served by the HTTP layer and
//! the view helpers the display layer relies on (download grouping, genre
//! links, player URL).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::markers;

// Re-export parser models for convenience
pub use crate::parser::{Category, DownloadLink, Movie, MovieDetails, RecentPost};

/// Generic API response wrapper for successful responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the operation was successful (always true for this type)
    pub success: bool,
    /// The response payload
    pub data: T,
    /// ISO timestamp of when data was served
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Create a new successful API response with the current timestamp
    pub fn new(data: T) -> Self {
        Self::with_timestamp(data, Utc::now())
    }

    /// Create a new successful API response with a custom timestamp
    pub fn with_timestamp(data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            timestamp: timestamp.to_rfc3339(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Whether the operation was successful (always false for errors)
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
    /// ISO timestamp of when the error occurred
    pub timestamp: String,
}

impl ApiError {
    /// Create a new API error response with the current timestamp
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// One page of a movie listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResponse {
    pub items: Vec<Movie>,
    /// Page number that was requested
    pub page: u32,
    /// Whether asking for the next page is worthwhile
    pub has_more: bool,
}

impl MovieListResponse {
    pub fn new(items: Vec<Movie>, page: u32) -> Self {
        let has_more = !items.is_empty();
        Self {
            items,
            page,
            has_more,
        }
    }
}

/// Download links sharing a group heading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGroup {
    pub title: String,
    pub links: Vec<DownloadLink>,
}

/// A genre badge linking to its category listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenreLink {
    pub name: String,
    pub path: String,
}

/// Everything the movie page renders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub details: MovieDetails,
    /// Download links partitioned by group, in first-seen order
    pub download_groups: Vec<DownloadGroup>,
    pub genres: Vec<GenreLink>,
    /// Embedded player, present when the IMDB id is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_url: Option<String>,
}

impl MoviePage {
    pub fn new(details: MovieDetails, player_embed_base: &str) -> Self {
        let download_groups = group_download_links(&details.download_links);
        let genres = details
            .genres()
            .into_iter()
            .map(|name| GenreLink {
                path: category_path_for(&name),
                name,
            })
            .collect();
        let player_url = details
            .imdb_id
            .as_deref()
            .map(|id| format!("{}/{}", player_embed_base, id));

        Self {
            details,
            download_groups,
            genres,
            player_url,
        }
    }
}

/// Partition links by group title; links without one go to "Downloads".
pub fn group_download_links(links: &[DownloadLink]) -> Vec<DownloadGroup> {
    let mut groups: Vec<DownloadGroup> = Vec::new();

    for link in links {
        let title = link
            .group_title
            .as_deref()
            .unwrap_or(markers::DEFAULT_DOWNLOAD_GROUP);

        match groups.iter_mut().find(|g| g.title == title) {
            Some(group) => group.links.push(link.clone()),
            None => groups.push(DownloadGroup {
                title: title.to_string(),
                links: vec![link.clone()],
            }),
        }
    }

    groups
}

/// Category path for a genre name ("Sci Fi" -> "/category/sci-fi")
pub fn category_path_for(genre: &str) -> String {
    format!("/category/{}", genre.trim().to_lowercase().replace(' ', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, group: Option<&str>) -> DownloadLink {
        DownloadLink {
            url: url.to_string(),
            title: "Download".to_string(),
            quality: "Download".to_string(),
            group_title: group.map(|g| g.to_string()),
        }
    }

    #[test]
    fn test_group_download_links() {
        let links = vec![
            link("1", Some("720p Downloads")),
            link("2", None),
            link("3", Some("720p Downloads")),
            link("4", Some("G-Direct")),
            link("5", None),
        ];

        let groups = group_download_links(&links);
        let summary: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|g| {
                (
                    g.title.as_str(),
                    g.links.iter().map(|l| l.url.as_str()).collect(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("720p Downloads", vec!["1", "3"]),
                ("Downloads", vec!["2", "5"]),
                ("G-Direct", vec!["4"]),
            ]
        );
    }

    #[test]
    fn test_group_download_links_empty() {
        assert!(group_download_links(&[]).is_empty());
    }

    #[test]
    fn test_category_path_for() {
        assert_eq!(category_path_for("Action"), "/category/action");
        assert_eq!(category_path_for(" Science Fiction "), "/category/science-fiction");
    }

    #[test]
    fn test_movie_page_view() {
        let details = MovieDetails {
            title: "Iron Man".to_string(),
            category: Some("Action, Sci Fi".to_string()),
            imdb_id: Some("tt0371746".to_string()),
            download_links: vec![link("1", None)],
            ..MovieDetails::default()
        };

        let page = MoviePage::new(details, "https://player.example/embed/movie");
        assert_eq!(
            page.player_url.as_deref(),
            Some("https://player.example/embed/movie/tt0371746")
        );
        assert_eq!(page.genres[1].path, "/category/sci-fi");
        assert_eq!(page.download_groups[0].title, "Downloads");
    }

    #[test]
    fn test_movie_page_without_imdb_id() {
        let details = MovieDetails {
            title: "Unknown".to_string(),
            ..MovieDetails::default()
        };
        let page = MoviePage::new(details, "https://player.example/embed/movie");
        assert!(page.player_url.is_none());
        assert!(page.genres.is_empty());
    }

    #[test]
    fn test_movie_list_response_has_more() {
        assert!(!MovieListResponse::new(vec![], 3).has_more);
        let movie = Movie {
            title: "T".to_string(),
            image_url: "https://x/i.jpg".to_string(),
            path: "/t/".to_string(),
        };
        assert!(MovieListResponse::new(vec![movie], 1).has_more);
    }

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::new(vec![1, 2]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));

        let error = serde_json::to_value(ApiError::new("nope")).unwrap();
        assert_eq!(error["success"], false);
        assert_eq!(error["error"], "nope");
    }
}
