// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Strava API error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Strava request failed: {0}")]
    Transport(String),

    #[error("activity dataset not found")]
    DatasetNotFound,

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::TokenRefresh(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_refresh_failed",
                Some(msg.clone()),
            ),
            AppError::Remote { status, body } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "strava_error",
                Some(format!("HTTP {}: {}", status, body)),
            ),
            AppError::Transport(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "strava_error",
                Some(msg.clone()),
            ),
            AppError::DatasetNotFound => (
                StatusCode::NOT_FOUND,
                "dataset_not_found",
                Some("no saved dataset; call /strava/save-activities first".to_string()),
            ),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
