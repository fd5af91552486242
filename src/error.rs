use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Error taxonomy for the HTTP surface.
///
/// Everything a handler can fail with maps onto exactly one of these
/// variants; the `IntoResponse` impl is the single place where a failure
/// becomes a status code and a JSON body. Database and other unexpected
/// failures are logged with full detail and answered with an opaque 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
    },

    #[error("Invalid Credentials.")]
    InvalidCredentials,

    #[error("Authentication credentials were not provided or are invalid.")]
    AuthRequired,

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure with the generic code.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            code: "VALIDATION_ERROR",
            message: message.into(),
        }
    }

    /// Validation failure with a sharper machine-readable code.
    pub fn validation_with_code(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            code,
            message: message.into(),
        }
    }

    /// Map an insert error to a validation failure when it is a uniqueness or
    /// foreign-key constraint violation; anything else stays a database error.
    ///
    /// Concurrent creates race on the datastore's constraints, so a
    /// duplicate-key failure must surface as a 400, not a 500.
    pub fn from_insert(err: DbErr, code: &'static str, message: impl Into<String>) -> Self {
        let text = err.to_string().to_lowercase();
        if text.contains("unique") || text.contains("constraint") || text.contains("foreign key") {
            ApiError::Validation {
                code,
                message: message.into(),
            }
        } else {
            ApiError::Database(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation { code, message } => {
                (StatusCode::BAD_REQUEST, *code, message.clone())
            }
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            ApiError::AuthRequired => {
                (StatusCode::UNAUTHORIZED, "AUTH_REQUIRED", self.to_string())
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            ApiError::Database(err) => {
                error!("Database error reached the endpoint boundary: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                error!("Internal error reached the endpoint boundary: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };

        (status, Json(body)).into_response()
    }
}
