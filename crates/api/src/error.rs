//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_encoder::EncodingError;
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use weight_store::Property;

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid batch: {0}")]
    InvalidBatch(#[from] EncodingError),
    #[error("property not available: {0}")]
    PropertyUnavailable(Property),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::MissingProperty(property) => ApiError::PropertyUnavailable(property),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidBatch(_) | ApiError::PropertyUnavailable(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
