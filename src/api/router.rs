//! Route definitions.
//!
//! The JSON API lives under `/api`; every other path is looked up in the
//! static asset directory.

use std::path::Path;

use axum::{Router, handler::HandlerWithoutStateExt, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

pub fn build_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let api_routes = Router::new()
        .route("/rates/{base_currency}", get(handlers::rates))
        .route("/health", get(handlers::health))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found);

    let static_files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
