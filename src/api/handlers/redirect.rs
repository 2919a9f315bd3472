//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{short_url}`
///
/// # Request Flow
///
/// 1. Resolve the code through the cache, falling back to the store
/// 2. Schedule the access-count update in the background
/// 3. Return 301 Moved Permanently with the long URL in `Location`
///
/// The count update is not awaited; a client that disconnects early does
/// not cancel it.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
/// Returns 500 Internal Server Error if the cache or store fails.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let resolution = state.resolution_service.resolve(&short_url).await?;

    let location = location_header(&resolution.long_url)?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// The stored URL verbatim, or its percent-encoded form when it carries
/// bytes a header value cannot hold.
fn location_header(long_url: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(long_url) {
        return Ok(value);
    }

    let unusable = |reason: String| {
        AppError::internal(
            "Stored URL cannot be used as a redirect target",
            json!({ "reason": reason }),
        )
    };

    let parsed = Url::parse(long_url).map_err(|e| unusable(e.to_string()))?;
    HeaderValue::from_str(parsed.as_str()).map_err(|e| unusable(e.to_string()))
}
