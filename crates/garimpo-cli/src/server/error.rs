//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use garimpo::GarimpoError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
#[allow(dead_code)] // Variants kept for API completeness
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Error from the garimpo pipeline.
    Pipeline(GarimpoError),
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request".to_string(), msg),
            ApiError::Pipeline(e) => {
                let status = match &e {
                    GarimpoError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    GarimpoError::Config(_) | GarimpoError::Json(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, "pipeline_error".to_string(), e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                status: "error",
                error,
                message,
            }),
        )
            .into_response()
    }
}

impl From<GarimpoError> for ApiError {
    fn from(err: GarimpoError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Pipeline(e) => write!(f, "Pipeline error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
