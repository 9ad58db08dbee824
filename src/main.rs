//! Shift Swap Backend
//!
//! Collects shift swap requests from employees on rotating shifts and finds
//! pairs who can swap with each other on the same date.

mod api;
mod auth;
mod calendar;
mod config;
mod db;
mod errors;
mod matching;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting Shift Swap Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (SHIFTSWAP_API_PSK). Authentication is disabled!");
    }

    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let snapshot = repo.list_requests().await?;
    tracing::info!(
        "Loaded {} swap requests ({} malformed records skipped)",
        snapshot.requests.len(),
        snapshot.skipped
    );

    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        .route("/revision", get(api::get_revision))
        // Swap requests
        .route("/requests", get(api::list_requests))
        .route("/requests/mine", get(api::list_my_requests))
        .route("/requests/mine/{date}", get(api::get_my_request))
        .route(
            "/requests/{date}",
            put(api::upsert_request).delete(api::delete_request),
        )
        // Matches
        .route("/matches", get(api::list_matches))
        .route("/matches/mine", get(api::my_matches))
        // Calendar
        .route("/calendar/{year}/{month}", get(api::get_month_dates))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
