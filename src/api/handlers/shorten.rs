//! Handler for the URL creation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::url::{CreateUrlRequest, ShortUrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/page",
///   "alias": "demo"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_url": "http://localhost:3000/aZ3_k9-Qx",
///   "short_code": "aZ3_k9-Qx",
///   "alias": "demo",
///   "long_url": "https://example.com/page",
///   "created_at": "2025-06-24T10:00:00Z"
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: A new record was stored
/// - **200 OK**: The generated code was taken; the existing record is returned
/// - **400 Bad Request**: Missing or invalid URL, or a malformed body
/// - **500 Internal Server Error**: Store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::invalid_input(
            "Invalid request. The request body is malformed.",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    payload.validate()?;

    let long_url = payload
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            AppError::invalid_input(
                "Invalid request. The provided URL is invalid.",
                json!({ "reason": "url is required" }),
            )
        })?;

    let shortened = state
        .shortening_service
        .create_short_url(&long_url, payload.alias)
        .await?;

    let status = if shortened.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(shortened.into())))
}
