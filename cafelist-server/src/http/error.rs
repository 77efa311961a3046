//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status
//! codes: validation 400, unauthorized 401, not-found 404, conflict
//! 409, everything else 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use cafelist_core::{AssociationError, RecommendError, ValidationError};

use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(String),

    /// Missing/invalid/expired credentials or inactive user (401)
    Unauthorized(&'static str),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Uniqueness conflict after rollback (409)
    Conflict(String),

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": message
                }),
            ),
            Self::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "unauthorized",
                    "message": message
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Conflict(message) => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": message
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return a generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<AssociationError> for ApiError {
    fn from(e: AssociationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<RecommendError> for ApiError {
    fn from(e: RecommendError) -> Self {
        match e {
            RecommendError::TargetNotFound(id) => Self::NotFound {
                resource: "cafe",
                id: id.to_string(),
            },
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict(message) => Self::Conflict(message),
            _ => Self::Database(e),
        }
    }
}
