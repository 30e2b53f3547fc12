//! Unified error handling
//!
//! [`AppError`] is the application-level error for HTTP handlers. Every
//! variant maps to a status code and a `{ success: false, error }` body;
//! 5xx details are logged and masked before reaching the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use shared::AppResponse;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business logic errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== System errors (5xx) ==========
    /// One of the four source fetches failed. Whole-operation failure:
    /// no partial aggregation, no retry.
    #[error("Source fetch failed: {0}")]
    SourceFetch(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            AppError::SourceFetch(msg) => {
                error!(target: "reports", error = %msg, "Source fetch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch report data".to_string(),
                )
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(AppResponse::<()>::error(message))).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn source_fetch(msg: impl Into<String>) -> Self {
        Self::SourceFetch(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
