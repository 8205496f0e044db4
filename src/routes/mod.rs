/// Application routes configuration
use crate::handlers::{get_launch, health, launch_stats, list_launches, root, AppState};
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Version prefix for the launch API
pub const API_PREFIX: &str = "/api/v1";

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/launches", get(list_launches))
        .route("/launches/stats", get(launch_stats))
        .route("/launches/:flight_number", get(get_launch));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
