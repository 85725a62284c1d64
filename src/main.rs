//! Movie Mirror API Server
//!
//! Main entry point for the movie mirror REST API service.

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use movie_mirror::catalog::Catalog;
use movie_mirror::config::Config;
use movie_mirror::routes::{configure_routes, ApiDoc, AppState};

/// Health check endpoint, reports cache usage
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let scraper = data.catalog.scraper();

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "upstream": data.catalog.base_url(),
        "cachedPages": scraper.cache().len(),
        "cacheCapacity": scraper.cache().max_entries(),
        "upstreamRequests": scraper.request_count(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let bind_address = format!("{}:{}", config.host, config.port);

    let catalog = Catalog::from_config(&config).map_err(|e| {
        error!("Failed to create HTTP client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!(
        "Mirroring {} (cache ttl {}s, max {} pages, categories {:?})",
        config.base_url,
        config.cache_ttl.as_secs(),
        config.cache_max_entries,
        config.category_source
    );

    let sweep_every = config.cache_ttl.max(Duration::from_secs(60));
    let app_state = web::Data::new(AppState { catalog, config });

    // Stale pages are dropped even while no fetches happen
    let sweeper_state = app_state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_every);
        loop {
            ticker.tick().await;
            let purged = sweeper_state.catalog.scraper().cache().purge_expired();
            debug!("Purged {} stale pages from the HTML cache", purged);
        }
    });

    info!("Starting Movie Mirror API server on {}", bind_address);

    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .route("/health", web::get().to(health_check))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
