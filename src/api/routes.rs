use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Upper bound on JSON request bodies
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Creates the main router: JSON API under `/api`, health probe, and the
/// frontend bundle in `static_dir` for everything else
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Search
        .route("/search", get(handlers::search))
        // Users
        .route("/users", get(handlers::list_users))
        .route("/users/:id/preferences", put(handlers::update_preferences))
        .route(
            "/users/:id/history",
            get(handlers::get_history).post(handlers::add_history),
        )
        .route(
            "/users/:id/recommendations",
            get(handlers::get_recommendations),
        )
}
