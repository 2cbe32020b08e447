//! Route definitions for the API server

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Creates the main application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // Read-only API, open to any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard page
        .route("/", get(handlers::dashboard_page))
        // Health check
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/instruments", get(handlers::list_instruments))
        // Pipeline results
        .route("/api/cot/:instrument", get(handlers::get_dashboard))
        .route("/api/cot/:instrument/csv", get(handlers::download_csv))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
