//! API Routes module for the Movie Mirror API
//!
//! This module contains all HTTP route handlers for the public API endpoints.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiError, ApiResponse, Category, DownloadGroup, DownloadLink, GenreLink, Movie,
    MovieDetails, MovieListResponse, MoviePage, RecentPost,
};

/// Application state shared across handlers
pub struct AppState {
    pub catalog: Catalog,
    pub config: Config,
}

/// Query parameters for paginated listings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<u32>,
}

/// Query parameters for search endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Search keyword
    pub q: Option<String>,
    /// Page number (default: 1)
    pub page: Option<u32>,
}

fn page_number(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

/// GET /api/movies - Latest movies from the homepage
#[utoipa::path(
    get,
    path = "/api/movies",
    tag = "movies",
    params(PageQuery),
    responses(
        (status = 200, description = "Homepage movies retrieved successfully", body = MovieListResponse)
    )
)]
pub async fn get_movies(data: web::Data<AppState>, query: web::Query<PageQuery>) -> HttpResponse {
    let page = page_number(query.page);
    info!("Fetching homepage movies: page={}", page);

    let movies = data.catalog.get_homepage_movies(page).await;
    HttpResponse::Ok().json(ApiResponse::new(MovieListResponse::new(movies, page)))
}

/// GET /api/search - Search for movies
///
/// Query parameter: q (required) - search keyword
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "movies",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results retrieved successfully", body = MovieListResponse),
        (status = 400, description = "Bad request - search query is required", body = ApiError)
    )
)]
pub async fn search_movies(
    data: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let keyword = match &query.q {
        Some(q) if !q.trim().is_empty() => q.trim(),
        _ => return Err(AppError::validation("Search query is required")),
    };
    let page = page_number(query.page);

    info!("Searching for movies: {} (page {})", keyword, page);
    let movies = data.catalog.get_search_results(keyword, page).await;

    Ok(HttpResponse::Ok().json(ApiResponse::new(MovieListResponse::new(movies, page))))
}

/// GET /api/category/{path} - Movies of a category
#[utoipa::path(
    get,
    path = "/api/category/{path}",
    tag = "movies",
    params(
        ("path" = String, Path, description = "Category slug or path, e.g. action or category/action"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Category movies retrieved successfully", body = MovieListResponse)
    )
)]
pub async fn get_category_movies(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let category = path.into_inner();
    let page = page_number(query.page);
    info!("Fetching category movies: {} (page {})", category, page);

    let movies = data.catalog.get_category_movies(&category, page).await;
    HttpResponse::Ok().json(ApiResponse::new(MovieListResponse::new(movies, page)))
}

/// GET /api/movie/{path} - Movie details with grouped downloads
#[utoipa::path(
    get,
    path = "/api/movie/{path}",
    tag = "movies",
    params(
        ("path" = String, Path, description = "Site-relative movie path, e.g. iron-man-2008/")
    ),
    responses(
        (status = 200, description = "Movie details retrieved successfully", body = MoviePage),
        (status = 404, description = "Movie not found", body = ApiError)
    )
)]
pub async fn get_movie(data: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let movie_path = path.into_inner();
    info!("Fetching movie details: {}", movie_path);

    let details = data
        .catalog
        .get_movie_details(&movie_path)
        .await
        .ok_or_else(|| AppError::not_found("Movie not found"))?;

    let page = MoviePage::new(details, &data.config.player_embed_base);
    Ok(HttpResponse::Ok().json(ApiResponse::new(page)))
}

/// GET /api/categories - Navigation categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "navigation",
    responses(
        (status = 200, description = "Categories retrieved successfully", body = Vec<Category>)
    )
)]
pub async fn get_categories(data: web::Data<AppState>) -> HttpResponse {
    let categories = data.catalog.get_categories().await;
    HttpResponse::Ok().json(ApiResponse::new(categories))
}

/// GET /api/recent-posts - Recent posts widget
#[utoipa::path(
    get,
    path = "/api/recent-posts",
    tag = "navigation",
    responses(
        (status = 200, description = "Recent posts retrieved successfully", body = Vec<RecentPost>)
    )
)]
pub async fn get_recent_posts(data: web::Data<AppState>) -> HttpResponse {
    let posts = data.catalog.get_recent_posts().await;
    HttpResponse::Ok().json(ApiResponse::new(posts))
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movie Mirror API",
        version = "0.1.0",
        description = "Read-only API over a mirrored WordPress movie catalog",
        license(
            name = "MIT"
        )
    ),
    paths(
        get_movies,
        search_movies,
        get_category_movies,
        get_movie,
        get_categories,
        get_recent_posts
    ),
    components(
        schemas(
            Movie,
            MovieDetails,
            DownloadLink,
            DownloadGroup,
            GenreLink,
            Category,
            RecentPost,
            MovieListResponse,
            MoviePage,
            ApiError,
            PageQuery,
            SearchQuery
        )
    ),
    tags(
        (name = "movies", description = "Movie listings and details"),
        (name = "navigation", description = "Categories and recent posts")
    )
)]
pub struct ApiDoc;

/// Configure API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/movies", web::get().to(get_movies))
            .route("/search", web::get().to(search_movies))
            .route("/category/{path:.*}", web::get().to(get_category_movies))
            .route("/movie/{path:.*}", web::get().to(get_movie))
            .route("/categories", web::get().to(get_categories))
            .route("/recent-posts", web::get().to(get_recent_posts)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategorySource;
    use crate::scraper::Scraper;
    use crate::test_support::MockUpstream;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    fn state_for(base_url: &str) -> web::Data<AppState> {
        let config = Config {
            base_url: base_url.to_string(),
            player_embed_base: "https://player.example/embed/movie".to_string(),
            ..Config::default()
        };
        let catalog = Catalog::new(Scraper::new().unwrap(), base_url, CategorySource::Static);
        web::Data::new(AppState { catalog, config })
    }

    #[actix_rt::test]
    async fn test_search_requires_query() {
        let app = test::init_service(
            App::new()
                .app_data(state_for("http://127.0.0.1:9"))
                .configure(configure_routes),
        )
        .await;

        for uri in ["/api/search", "/api/search?q=%20%20"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Search query is required");
        }
    }

    #[actix_rt::test]
    async fn test_missing_movie_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(state_for("http://127.0.0.1:9"))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/movie/nope/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_unreachable_upstream_lists_are_empty() {
        let app = test::init_service(
            App::new()
                .app_data(state_for("http://127.0.0.1:9"))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/movies?page=2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["items"], serde_json::json!([]));
        assert_eq!(body["data"]["page"], 2);
        assert_eq!(body["data"]["hasMore"], false);
    }

    #[actix_rt::test]
    async fn test_categories_static_list() {
        let app = test::init_service(
            App::new()
                .app_data(state_for("http://127.0.0.1:9"))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/categories").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let categories = body["data"].as_array().unwrap();
        assert!(!categories.is_empty());
        assert_eq!(categories[0]["path"], "/category/dual-audio-hindi-english-movies/");
    }

    #[actix_rt::test]
    async fn test_category_and_movie_through_upstream() {
        let listing = r#"<html><body>
            <article class="post-item">
              <img class="blog-picture" src="/covers/iron.jpg">
              <h3 class="entry-title"><a href="/iron-man-2008/">Iron Man (2008)</a></h3>
            </article>
        </body></html>"#;
        let detail = r#"<html><body>
            <h1 class="entry-title">Iron Man (2008)</h1>
            <div class="entry-content">
              <p>IMDb Rating: 7.9<br>Genres: Action, Sci Fi</p>
              <h5>720p Downloads</h5>
              <p><a class="btn" href="https://dl.example/1"><button class="dwd-button">720p [1GB]</button></a></p>
            </div>
            <div class="tabs__content"><iframe src="https://p.example/tt0371746"></iframe></div>
        </body></html>"#;
        let upstream = MockUpstream::start(vec![
            ("/action/page/2/", 200, listing.to_string()),
            ("/iron-man-2008/", 200, detail.to_string()),
        ]);
        let app = test::init_service(
            App::new()
                .app_data(state_for(upstream.base_url()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/category/category/action?page=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["items"][0]["path"], "/iron-man-2008/");
        assert_eq!(body["data"]["hasMore"], true);

        let req = test::TestRequest::get()
            .uri("/api/movie/iron-man-2008/")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = &body["data"];

        assert_eq!(data["details"]["title"], "Iron Man (2008)");
        assert_eq!(data["details"]["rating"], "7.9");
        assert_eq!(data["downloadGroups"][0]["title"], "720p Downloads");
        assert_eq!(data["downloadGroups"][0]["links"][0]["quality"], "720p");
        assert_eq!(data["genres"][1]["path"], "/category/sci-fi");
        assert_eq!(
            data["playerUrl"],
            "https://player.example/embed/movie/tt0371746"
        );
    }
}
