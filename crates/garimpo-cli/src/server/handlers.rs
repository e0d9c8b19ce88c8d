//! Request handlers.

use axum::extract::State;
use axum::Json;
use garimpo::{Payload, ProcessOutput};
use serde_json::json;

use super::error::ApiError;
use super::AppState;

/// `GET /` - liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"message": "garimpo pipeline is online"}))
}

/// `POST /process` - run the pipeline over a JSON payload.
pub async fn process(
    State(state): State<AppState>,
    Json(payload): Json<Payload>,
) -> Result<Json<ProcessOutput>, ApiError> {
    let output = state.garimpo.process(&payload)?;
    Ok(Json(output))
}
