//! Operation handlers: awaited invocation and fire-and-forget signals.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::schema::common::{Reply, SignalAccepted};
use crate::schema::ops::Operation;
use crate::state::AppState;

fn parse_operation(name: &str) -> Result<Operation, ApiError> {
    name.parse::<Operation>().map_err(ApiError::NotFound)
}

/// An empty request body stands for `{}`.
fn parse_payload(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Runs an operation and returns its reply. Failed replies are still 200.
///
/// `POST /ops/{operation}/{id}`
pub async fn invoke(
    State(state): State<AppState>,
    Path((operation, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Reply>, ApiError> {
    let operation = parse_operation(&operation)?;
    let payload = parse_payload(&body)?;
    let reply = state.service.invoke(operation, &id, payload).await;
    Ok(Json(reply))
}

/// Queues an operation; its reply is published on the egress channel.
///
/// `POST /signal/{operation}/{id}`
pub async fn signal(
    State(state): State<AppState>,
    Path((operation, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<SignalAccepted>), ApiError> {
    let operation = parse_operation(&operation)?;
    let payload = parse_payload(&body)?;
    let query_id = state.service.signal(operation, &id, payload)?;
    Ok((StatusCode::ACCEPTED, Json(SignalAccepted { query_id })))
}
