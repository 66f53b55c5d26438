//! Read-only graph inspection handlers.

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::queries::{
    EdgeView, InEdgesResponse, KeysQuery, KeysResponse, OutEdgesResponse, TaggedEdgesResponse,
    VertexView,
};
use crate::state::AppState;

/// `GET /vertices/{id}`
pub async fn get_vertex(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VertexView>, ApiError> {
    Ok(Json(state.service.vertex(&id)?))
}

/// `GET /vertices/{id}/out`
pub async fn out_edges(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OutEdgesResponse>, ApiError> {
    Ok(Json(state.service.out_edges(&id)?))
}

/// `GET /vertices/{id}/in`
pub async fn in_edges(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InEdgesResponse>, ApiError> {
    Ok(Json(state.service.in_edges(&id)?))
}

/// `GET /vertices/{id}/tags/{tag}`
pub async fn tagged_edges(
    State(state): State<AppState>,
    Path((id, tag)): Path<(String, String)>,
) -> Result<Json<TaggedEdgesResponse>, ApiError> {
    Ok(Json(state.service.tagged_edges(&id, &tag)?))
}

/// `GET /vertices/{id}/edges/{link_type}/{target}`
pub async fn get_edge(
    State(state): State<AppState>,
    Path((id, link_type, target)): Path<(String, String, String)>,
) -> Result<Json<EdgeView>, ApiError> {
    Ok(Json(state.service.edge(&id, &link_type, &target)?))
}

/// Raw key scan for debugging.
///
/// `GET /keys?pattern=...`
pub async fn scan_keys(
    State(state): State<AppState>,
    Query(params): Query<KeysQuery>,
) -> Result<Json<KeysResponse>, ApiError> {
    Ok(Json(state.service.keys(&params.pattern)?))
}
