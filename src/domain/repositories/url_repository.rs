//! Repository trait for the durable record store.

use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store contract for URL records.
///
/// Every operation runs under the store's configured consistency policy
/// (majority acknowledgement by default).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process test double
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Point lookup by short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Inserts the record unless the code is already taken.
    ///
    /// Never overwrites: if the code exists, the stored record is returned
    /// untouched as [`InsertOutcome::Existing`]. New records start with
    /// `access_count = 0` and a store-assigned `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError>;

    /// Reads only the access counter. `Ok(None)` if the code is unknown.
    async fn get_access_count(&self, short_code: &str) -> Result<Option<i64>, AppError>;

    /// Overwrites the access counter.
    ///
    /// Returns `Ok(false)` if no record matched.
    async fn set_access_count(&self, short_code: &str, count: i64) -> Result<bool, AppError>;

    /// Increments the counter in a single statement and returns the new value.
    ///
    /// `Ok(None)` if the code is unknown.
    async fn increment_access_count(&self, short_code: &str) -> Result<Option<i64>, AppError>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
