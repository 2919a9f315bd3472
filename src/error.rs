//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the service layer returns [`AppError`]. The
//! variant decides the status code; the message and details end up in the
//! JSON error body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::infrastructure::cache::CacheError;

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input. Raised before any store access.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// Unknown short code, or a stored URL that no longer validates.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The durable store or the cache failed or timed out on the primary path.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// The canonical "unknown short code" error.
    pub fn resource_not_found(short_code: &str) -> Self {
        Self::not_found("Resource not found.", json!({ "short_code": short_code }))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        let (code, message, details) = match self {
            AppError::InvalidInput { message, details } => ("invalid_input", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            // Store internals are logged, not echoed back to clients.
            AppError::StoreUnavailable { .. } => {
                return ErrorBody {
                    code: "store_unavailable",
                    message: "Internal server error.".to_string(),
                    details: Value::Null,
                };
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorBody {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_error_body())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::store_unavailable("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::store_unavailable("Cache error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or(Value::Null);
        AppError::invalid_input("Invalid request. The provided payload is invalid.", details)
    }
}
