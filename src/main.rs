//! Badge Catalog
//!
//! Serves a searchable, faceted gallery of digital badge credentials loaded from
//! a published JSON document.

mod api;
mod catalog;
mod config;
mod errors;
mod models;
mod render;
mod source;
mod view;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::Catalog;
use config::Config;
use source::BadgeSource;
use view::{ViewRegistry, ViewSettings};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub views: Arc<ViewRegistry>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, errors::AppError> {
        let source = BadgeSource::new(config.source_url.clone(), config.fetch_timeout)?;
        let catalog = Arc::new(Catalog::new(source));
        let views = Arc::new(ViewRegistry::new(
            Arc::clone(&catalog),
            ViewSettings::from(config),
        ));

        Ok(Self { catalog, views })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Badge Catalog");
    tracing::info!("Badge source: {}", config.source_url);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!(
        "Debounce window: {:?} ({} input)",
        config.debounce,
        config.search_input.as_str()
    );
    tracing::info!(
        "Views: idle TTL {:?}, at most {} open",
        config.view_idle_ttl,
        config.max_views
    );

    if config.fetch_timeout.is_none() {
        tracing::warn!("No fetch timeout configured (BADGE_FETCH_TIMEOUT_SECS); a stalled source keeps the catalog pending");
    }

    let state = AppState::new(&config)?;

    // Load badges in the background; the server answers while the fetch is in flight.
    let catalog = Arc::clone(&state.catalog);
    tokio::spawn(async move {
        // load() logs its own failure
        let _ = catalog.load().await;
    });

    // Evict views whose clients went away
    let sweep_period = config.view_idle_ttl.min(Duration::from_secs(60));
    Arc::clone(&state.views).spawn_sweeper(sweep_period);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Catalog
        .route("/catalog", get(api::get_catalog))
        .route("/catalog/reload", post(api::reload_catalog))
        .route("/facets", get(api::get_facets))
        // Badges
        .route("/badges", get(api::list_badges))
        .route("/badges/{id}", get(api::get_badge))
        .route("/cards", get(api::list_cards))
        // Views
        .route("/views", post(api::create_view))
        .route("/views/{id}", get(api::get_view).delete(api::delete_view))
        .route("/views/{id}/search", put(api::update_view_search))
        .route("/views/{id}/filter", put(api::update_view_filter))
        .route("/views/{id}/cards", get(api::get_view_cards));

    // Pages and health check
    let page_routes = Router::new()
        .route("/", get(api::gallery))
        .route(
            "/views/{id}",
            get(api::view_gallery).post(api::submit_view_controls),
        )
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
