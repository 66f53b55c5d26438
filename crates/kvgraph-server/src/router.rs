//! Router assembly for the kvgraph HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Mutations
        .route("/ops/{operation}/{id}", post(handlers::ops::invoke))
        .route("/signal/{operation}/{id}", post(handlers::ops::signal))
        // Reads
        .route("/vertices/{id}", get(handlers::queries::get_vertex))
        .route("/vertices/{id}/out", get(handlers::queries::out_edges))
        .route("/vertices/{id}/in", get(handlers::queries::in_edges))
        .route(
            "/vertices/{id}/tags/{tag}",
            get(handlers::queries::tagged_edges),
        )
        .route(
            "/vertices/{id}/edges/{link_type}/{target}",
            get(handlers::queries::get_edge),
        )
        .route("/keys", get(handlers::queries::scan_keys))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
