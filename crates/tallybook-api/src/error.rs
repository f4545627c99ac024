//! Error types for tallybook-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tallybook_core::{EngineError, ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Upstream storage failure")]
    Upstream { message: String },

    #[error("Internal server error")]
    InternalError,
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err.code() {
            ErrorCode::InvalidRange | ErrorCode::RecurrenceConfig => ApiError::BadRequest {
                message: err.to_string(),
            },
            ErrorCode::UpstreamRead => ApiError::Upstream {
                message: err.to_string(),
            },
            ErrorCode::InternalError => ApiError::InternalError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Upstream { message } => {
                log::error!("Upstream failure: {}", message);
                (StatusCode::BAD_GATEWAY, "Storage read failed".to_string())
            }
            ApiError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
