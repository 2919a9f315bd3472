//! URL record entity: one short code mapped to one long URL.

use chrono::{DateTime, Utc};

/// A persisted short code → long URL mapping.
///
/// Records are created once and never deleted. Only `access_count` changes
/// after insert, and only through the accounting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub short_code: String,
    pub long_url: String,
    pub alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub access_count: i64,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        short_code: String,
        long_url: String,
        alias: Option<String>,
        created_at: DateTime<Utc>,
        access_count: i64,
    ) -> Self {
        Self {
            short_code,
            long_url,
            alias,
            created_at,
            access_count,
        }
    }
}

/// Input data for inserting a record. `created_at` and `access_count` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub short_code: String,
    pub long_url: String,
    pub alias: Option<String>,
}

/// Result of a conditional insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The code was free and the record was written.
    Created(UrlRecord),
    /// The code was already taken; the stored record is returned untouched.
    Existing(UrlRecord),
}

impl InsertOutcome {
    pub fn into_record(self) -> UrlRecord {
        match self {
            InsertOutcome::Created(record) | InsertOutcome::Existing(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, InsertOutcome::Created(_))
    }
}
