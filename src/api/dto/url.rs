//! DTOs for the URL creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenedUrl;

/// Request to shorten a single URL.
///
/// `url` is optional at the serde level so a missing field is reported as
/// an invalid URL rather than a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(length(max = 2048))]
    pub url: Option<String>,

    /// Free-form label stored with the record. Not used for lookup.
    #[validate(length(max = 100))]
    pub alias: Option<String>,
}

/// A created (or colliding, pre-existing) short URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortUrlResponse {
    pub short_url: String,
    pub short_code: String,
    pub alias: Option<String>,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<ShortenedUrl> for ShortUrlResponse {
    fn from(shortened: ShortenedUrl) -> Self {
        let record = shortened.record;

        Self {
            short_url: shortened.short_url,
            short_code: record.short_code,
            alias: record.alias,
            long_url: record.long_url,
            created_at: record.created_at,
        }
    }
}
