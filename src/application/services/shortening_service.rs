//! Short URL creation service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::deadline::within;
use crate::utils::url_validator::parse_absolute_url;

/// What to do when a freshly generated code is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Hand back the record that already owns the code, without inserting.
    #[default]
    ReturnExisting,
    /// Draw a new code, up to `max_attempts` codes in total.
    Regenerate { max_attempts: usize },
}

impl CollisionPolicy {
    fn max_attempts(&self) -> usize {
        match self {
            CollisionPolicy::ReturnExisting => 1,
            CollisionPolicy::Regenerate { max_attempts } => (*max_attempts).max(1),
        }
    }
}

/// A record returned by [`ShorteningService::create_short_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub record: UrlRecord,
    /// `base_url/short_code`, ready to display.
    pub short_url: String,
    /// `false` when the code collided and an existing record was returned.
    pub created: bool,
}

/// Service for creating short URLs.
///
/// Generates a candidate code, checks the store for a collision, and inserts
/// the record with `insert_if_absent` so a concurrent writer that grabbed the
/// same code in between is detected rather than overwritten.
pub struct ShorteningService {
    repository: Arc<dyn UrlRepository>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
    collision_policy: CollisionPolicy,
    store_timeout: Duration,
}

impl ShorteningService {
    /// Creates a new shortening service.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
        collision_policy: CollisionPolicy,
        store_timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            generator,
            base_url,
            collision_policy,
            store_timeout,
        }
    }

    /// Creates a short URL for `long_url`.
    ///
    /// # Collisions
    ///
    /// With [`CollisionPolicy::ReturnExisting`], a generated code that is
    /// already in use yields the existing record (`created == false`), even
    /// though it maps to someone else's URL. With
    /// [`CollisionPolicy::Regenerate`], a fresh code is drawn instead.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `long_url` is not an absolute URL;
    /// the store is not touched in that case.
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store fails or times out.
    ///
    /// Returns [`AppError::Internal`] if every regeneration attempt collided.
    pub async fn create_short_url(
        &self,
        long_url: &str,
        alias: Option<String>,
    ) -> Result<ShortenedUrl, AppError> {
        parse_absolute_url(long_url).map_err(|e| {
            AppError::invalid_input(
                "Invalid request. The provided URL is invalid.",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let alias = alias.filter(|a| !a.trim().is_empty());
        let max_attempts = self.collision_policy.max_attempts();

        for attempt in 1..=max_attempts {
            let short_code = self.generator.generate();

            let existing = within(
                self.store_timeout,
                "find_by_code",
                &short_code,
                self.repository.find_by_code(&short_code),
            )
            .await?;

            let outcome = match existing {
                Some(record) => InsertOutcome::Existing(record),
                None => {
                    let new_record = NewUrlRecord {
                        short_code: short_code.clone(),
                        long_url: long_url.to_string(),
                        alias: alias.clone(),
                    };
                    within(
                        self.store_timeout,
                        "insert_if_absent",
                        &short_code,
                        self.repository.insert_if_absent(new_record),
                    )
                    .await?
                }
            };

            match outcome {
                InsertOutcome::Created(record) => {
                    info!(short_code = %record.short_code, "Short URL created");
                    return Ok(self.shortened(record, true));
                }
                InsertOutcome::Existing(record) => {
                    metrics::counter!("shortlink_collisions_total").increment(1);
                    warn!(short_code = %short_code, attempt, max_attempts, "Short code collision");

                    if self.collision_policy == CollisionPolicy::ReturnExisting {
                        return Ok(self.shortened(record, false));
                    }
                }
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": max_attempts }),
        ))
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    fn shortened(&self, record: UrlRecord, created: bool) -> ShortenedUrl {
        ShortenedUrl {
            short_url: self.short_url(&record.short_code),
            record,
            created,
        }
    }
}
