use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_body_size;
    let static_files = ServeDir::new(&state.config.assets.static_dir);

    Router::new()
        // Viewer shell
        .route("/", get(handlers::index))
        .nest_service("/static", static_files)
        // Lookup table
        .route("/load_lookup_path", post(handlers::load_lookup_path))
        .route("/get_uuid_page/:page", get(handlers::get_uuid_page))
        // Per-uuid resolvers
        .route("/get_image", post(handlers::get_image))
        .route("/get_metadata", post(handlers::get_metadata))
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
