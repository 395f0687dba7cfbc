use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Structural index error. Unrelated to a stopover being out of vehicle
    /// range, which is reported as a `RejectedStopover` and never as an error.
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Directions provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("No route found: {0}")]
    NoRouteFound(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Storage(format!("Serialization failed: {}", e))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::Storage(format!("Redis error: {}", e))
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
            AppError::ProviderUnavailable(ref e) => {
                tracing::error!("Directions provider unavailable: {}", e);
                StatusCode::BAD_GATEWAY
            }
            AppError::NoRouteFound(ref e) => {
                tracing::warn!("No route found: {}", e);
                StatusCode::BAD_GATEWAY
            }
            AppError::Geocoding(ref e) => {
                tracing::error!("Geocoding error: {}", e);
                StatusCode::BAD_GATEWAY
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
